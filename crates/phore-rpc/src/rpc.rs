//! Phore RPC backend

use crate::parser::PhoreParser;
use async_trait::async_trait;
use phore_chain::types::BlockThin;
use phore_chain::{
    BitcoinRpc, Block, BlockChain, BlockChainParser, BlockHeader, ChainInfo, Error, JsonMarshaler,
    Result, RpcConfig, RpcErrorKind, RpcTransport, Tx,
};
use phore_params::{get_chain_params, ChainParamsRegistry, MAIN_PHORE_NET};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Phore backend over a Phore node's JSON-RPC interface
pub struct PhoreRpc {
    inner: BitcoinRpc,
    registry: Arc<ChainParamsRegistry>,
    parser: Option<Arc<PhoreParser>>,
    testnet: bool,
    network: String,
}

#[allow(dead_code)]
fn _assert_phore_rpc_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PhoreRpc>();
}

impl PhoreRpc {
    /// Create a backend from the coin's JSON config
    pub fn new(config: &Value, registry: Arc<ChainParamsRegistry>) -> Result<Self> {
        let inner = BitcoinRpc::new(config)?;
        Ok(Self::from_client(inner, registry))
    }

    /// Create a backend over a custom transport
    pub fn with_transport(
        config: RpcConfig,
        transport: Arc<dyn RpcTransport>,
        registry: Arc<ChainParamsRegistry>,
    ) -> Self {
        Self::from_client(BitcoinRpc::with_transport(config, transport), registry)
    }

    fn from_client(mut inner: BitcoinRpc, registry: Arc<ChainParamsRegistry>) -> Self {
        inner.set_marshaler(JsonMarshaler::V1);
        Self {
            inner,
            registry,
            parser: None,
            testnet: false,
            network: String::new(),
        }
    }

    /// Underlying Bitcoin-family client
    pub fn client(&self) -> &BitcoinRpc {
        &self.inner
    }

    /// Phore parser, available after `initialize`
    pub fn phore_parser(&self) -> Result<Arc<PhoreParser>> {
        self.parser.clone().ok_or(Error::NotInitialized)
    }
}

/// Whether `err` is the node's "No information available about transaction".
///
/// Annotation layers are unwrapped down to the node error and its code is
/// checked against `RPC_INVALID_ADDRESS_OR_KEY`.
pub fn is_transaction_unavailable(err: &Error) -> bool {
    err.rpc_error()
        .is_some_and(|e| e.kind() == RpcErrorKind::InvalidAddressOrKey)
}

#[async_trait]
impl BlockChain for PhoreRpc {
    async fn initialize(&mut self) -> Result<()> {
        let chain = self.inner.get_chain_info_and_initialize_mempool().await?;
        let params = get_chain_params(&self.registry, &chain);

        self.parser = Some(Arc::new(PhoreParser::new(Arc::clone(&params))));
        if params.net == MAIN_PHORE_NET {
            self.testnet = false;
            self.network = "livenet".to_string();
        } else {
            self.testnet = true;
            self.network = "testnet".to_string();
        }

        info!("rpc: block chain {}", params.name);
        Ok(())
    }

    fn is_testnet(&self) -> bool {
        self.testnet
    }

    fn network_name(&self) -> &str {
        &self.network
    }

    fn coin_name(&self) -> &str {
        &self.inner.config().coin_name
    }

    fn parser(&self) -> Result<Arc<dyn BlockChainParser>> {
        let parser: Arc<dyn BlockChainParser> = self.phore_parser()?;
        Ok(parser)
    }

    async fn get_chain_info(&self) -> Result<ChainInfo> {
        self.inner.get_chain_info().await
    }

    async fn get_best_block_hash(&self) -> Result<String> {
        self.inner.get_best_block_hash().await
    }

    async fn get_best_block_height(&self) -> Result<u32> {
        self.inner.get_best_block_height().await
    }

    async fn get_block_hash(&self, height: u32) -> Result<String> {
        self.inner.get_block_hash(height).await
    }

    async fn get_block_header(&self, hash: &str) -> Result<BlockHeader> {
        self.inner.get_block_header(hash).await
    }

    /// Block with its transactions fetched one by one.
    ///
    /// Transactions the node has no information about are left out, so the
    /// result may hold fewer transactions than the block's txid list.
    async fn get_block(&self, hash: &str, height: u32) -> Result<Block> {
        let hash = self.inner.resolve_block_hash(hash, height).await?;

        debug!("rpc: getblock (verbosity=1) {}", hash);
        let thin = self
            .inner
            .call::<BlockThin>(
                "getblock",
                &[("blockhash", json!(hash)), ("verbosity", json!(1))],
            )
            .await
            .and_then(|res| res.into_result("getblock"))
            .map_err(|e| e.annotate(format!("hash {}", hash)))?;

        let mut txs = Vec::with_capacity(thin.txids.len());
        for txid in &thin.txids {
            match self.inner.get_transaction(txid).await {
                Ok(tx) => txs.push(tx),
                Err(e) if is_transaction_unavailable(&e) => {
                    warn!(
                        "rpc: getblock: skipping transaction in block {} due to error: {}",
                        hash, e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Block {
            header: thin.header,
            txs,
        })
    }

    async fn get_transaction(&self, txid: &str) -> Result<Tx> {
        self.inner.get_transaction(txid).await
    }

    async fn get_transaction_for_mempool(&self, txid: &str) -> Result<Tx> {
        self.get_transaction(txid).await
    }

    async fn get_mempool_transactions(&self) -> Result<Vec<String>> {
        self.inner.get_mempool_transactions().await
    }

    async fn send_raw_transaction(&self, tx_hex: &str) -> Result<String> {
        self.inner.send_raw_transaction(tx_hex).await
    }
}
