//! Operator tool for a Phore backend
//!
//! Loads a coin JSON config, initializes the Phore RPC backend and prints
//! blocks, transactions or network parameters as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use phore_chain::BlockChain;
use phore_params::{get_chain_params, ChainParamsRegistry};
use phore_rpc::PhoreRpc;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "block-fetch")]
#[command(about = "Fetch blocks and transactions from a Phore node", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a block by hash or height
    Block {
        /// Coin JSON config
        #[arg(short, long)]
        config: PathBuf,

        /// Block hash
        #[arg(long, conflicts_with = "height")]
        hash: Option<String>,

        /// Block height
        #[arg(long)]
        height: Option<u32>,
    },

    /// Fetch a transaction
    Tx {
        /// Coin JSON config
        #[arg(short, long)]
        config: PathBuf,

        /// Transaction id
        txid: String,
    },

    /// Show the chain tip
    Tip {
        /// Coin JSON config
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the network parameters for a chain name
    Params {
        /// Chain name as reported by the node ("main", "test")
        #[arg(long, default_value = "main")]
        chain: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Block {
            config,
            hash,
            height,
        } => {
            let hash = hash.unwrap_or_default();
            let height = height.unwrap_or_default();
            if hash.is_empty() && height == 0 {
                anyhow::bail!("either --hash or a positive --height is required");
            }
            let rpc = connect(&config).await?;
            let block = rpc
                .get_block(&hash, height)
                .await
                .with_context(|| format!("fetching block hash {:?} height {}", hash, height))?;
            info!(
                "Block {} at height {} with {} transactions",
                block.header.hash,
                block.header.height,
                block.txs.len()
            );
            println!("{}", serde_json::to_string_pretty(&block)?);
        }
        Commands::Tx { config, txid } => {
            let rpc = connect(&config).await?;
            let tx = rpc.get_transaction(&txid).await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
        Commands::Tip { config } => {
            let rpc = connect(&config).await?;
            let height = rpc.get_best_block_height().await?;
            let hash = rpc.get_best_block_hash().await?;
            println!("{} {}", height, hash);
        }
        Commands::Params { chain } => {
            let params = get_chain_params(&ChainParamsRegistry::global(), &chain);
            println!("{}", serde_json::to_string_pretty(params.as_ref())?);
        }
    }

    Ok(())
}

async fn connect(config: &Path) -> anyhow::Result<PhoreRpc> {
    let data = std::fs::read_to_string(config)
        .with_context(|| format!("reading {}", config.display()))?;
    let value: serde_json::Value = serde_json::from_str(&data)
        .with_context(|| format!("parsing {}", config.display()))?;

    let mut rpc = PhoreRpc::new(&value, ChainParamsRegistry::global())?;
    rpc.initialize().await?;
    info!(
        "Connected to {} ({})",
        rpc.client().config().rpc_url,
        rpc.network_name()
    );
    Ok(rpc)
}
