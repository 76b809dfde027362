//! Backend capability set consumed by the indexer

use crate::parser::BlockChainParser;
use crate::types::{Block, BlockHeader, ChainInfo, Tx};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A coin backend: chain queries plus the parser for its transactions
#[async_trait]
pub trait BlockChain: Send + Sync {
    /// One-shot startup: resolve network parameters and build the parser
    async fn initialize(&mut self) -> Result<()>;

    /// Whether the backend runs against a test network
    fn is_testnet(&self) -> bool;

    /// Network label ("livenet" / "testnet")
    fn network_name(&self) -> &str;

    /// Coin display name
    fn coin_name(&self) -> &str;

    /// Transaction parser; available after `initialize`
    fn parser(&self) -> Result<Arc<dyn BlockChainParser>>;

    /// Chain state reported by the node
    async fn get_chain_info(&self) -> Result<ChainInfo>;

    /// Hash of the chain tip
    async fn get_best_block_hash(&self) -> Result<String>;

    /// Height of the chain tip
    async fn get_best_block_height(&self) -> Result<u32>;

    /// Hash of the main-chain block at `height`
    async fn get_block_hash(&self, height: u32) -> Result<String>;

    /// Header of the block with `hash`
    async fn get_block_header(&self, hash: &str) -> Result<BlockHeader>;

    /// Block by hash, or by height when `hash` is empty
    async fn get_block(&self, hash: &str, height: u32) -> Result<Block>;

    /// Decoded transaction
    async fn get_transaction(&self, txid: &str) -> Result<Tx>;

    /// Transaction as needed by the mempool
    async fn get_transaction_for_mempool(&self, txid: &str) -> Result<Tx>;

    /// Ids of transactions in the node's mempool
    async fn get_mempool_transactions(&self) -> Result<Vec<String>>;

    /// Broadcast a raw transaction, returning its txid
    async fn send_raw_transaction(&self, tx_hex: &str) -> Result<String>;
}
