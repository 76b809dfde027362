//! JSON-RPC client for Bitcoin-compatible nodes

use crate::config::RpcConfig;
use crate::mempool::Mempool;
use crate::transport::{HttpTransport, JsonMarshaler, RpcTransport};
use crate::types::{Block, BlockHeader, ChainInfo, Tx};
use crate::{Error, Result, RpcError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// `result`/`error` envelope of a JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<R> {
    /// Call result, absent on error
    pub result: Option<R>,
    /// Node error, absent on success
    pub error: Option<RpcError>,
}

impl<R> RpcResponse<R> {
    /// Turn the envelope into a result; `method` names the call in errors
    pub fn into_result(self, method: &str) -> Result<R> {
        if let Some(e) = self.error {
            return Err(Error::Rpc(e));
        }
        self.result.ok_or_else(|| Error::EmptyResult(method.to_string()))
    }
}

/// Client for the node's JSON-RPC interface
pub struct BitcoinRpc {
    transport: Arc<dyn RpcTransport>,
    config: RpcConfig,
    marshaler: JsonMarshaler,
    mempool: Arc<Mempool>,
}

#[allow(dead_code)]
fn _assert_bitcoin_rpc_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BitcoinRpc>();
}

impl BitcoinRpc {
    /// Create a client from the coin's JSON backend config
    pub fn new(config: &Value) -> Result<Self> {
        let config = RpcConfig::from_json(config)?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: RpcConfig, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            config,
            marshaler: JsonMarshaler::default(),
            mempool: Arc::new(Mempool::new()),
        }
    }

    /// Backend configuration
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Parameter layout used for requests
    pub fn marshaler(&self) -> JsonMarshaler {
        self.marshaler
    }

    /// Select the parameter layout the node expects
    pub fn set_marshaler(&mut self, marshaler: JsonMarshaler) {
        self.marshaler = marshaler;
    }

    /// Mempool txid set
    pub fn mempool(&self) -> &Arc<Mempool> {
        &self.mempool
    }

    /// Issue a call and decode its envelope.
    ///
    /// Transport and decoding failures are returned as `Err`; a node error
    /// is returned inside the envelope.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, Value)],
    ) -> Result<RpcResponse<R>> {
        let request = self.marshaler.request(method, params);
        let raw = self.transport.call(request).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Chain state reported by the node
    pub async fn get_chain_info(&self) -> Result<ChainInfo> {
        debug!("rpc: getblockchaininfo");
        self.call::<ChainInfo>("getblockchaininfo", &[])
            .await?
            .into_result("getblockchaininfo")
    }

    /// Fetch chain info and make sure the mempool has been synced once.
    ///
    /// Returns the chain name.
    pub async fn get_chain_info_and_initialize_mempool(&self) -> Result<String> {
        let chain_info = self.get_chain_info().await?;
        if !self.mempool.is_initialized() {
            let count = self.resync_mempool().await?;
            info!("rpc: mempool initialized with {} transactions", count);
        }
        Ok(chain_info.chain)
    }

    /// Refresh the mempool from the node, returning the number of new txids
    pub async fn resync_mempool(&self) -> Result<usize> {
        let txids = self.get_mempool_transactions().await?;
        Ok(self.mempool.replace(txids))
    }

    /// Hash of the chain tip
    pub async fn get_best_block_hash(&self) -> Result<String> {
        debug!("rpc: getbestblockhash");
        self.call::<String>("getbestblockhash", &[])
            .await?
            .into_result("getbestblockhash")
    }

    /// Height of the chain tip
    pub async fn get_best_block_height(&self) -> Result<u32> {
        debug!("rpc: getblockcount");
        self.call::<u32>("getblockcount", &[])
            .await?
            .into_result("getblockcount")
    }

    /// Hash of the main-chain block at `height`
    pub async fn get_block_hash(&self, height: u32) -> Result<String> {
        debug!("rpc: getblockhash {}", height);
        let res = self
            .call::<String>("getblockhash", &[("height", json!(height))])
            .await
            .map_err(|e| e.annotate(format!("height {}", height)))?;
        block_lookup_result(res, format!("height {}", height))
    }

    /// Resolve the block hash to fetch: `hash` if given, else by `height`
    pub async fn resolve_block_hash(&self, hash: &str, height: u32) -> Result<String> {
        if hash.is_empty() && height > 0 {
            return self.get_block_hash(height).await;
        }
        Ok(hash.to_string())
    }

    /// Header of the block with `hash`
    pub async fn get_block_header(&self, hash: &str) -> Result<BlockHeader> {
        debug!("rpc: getblockheader {}", hash);
        let res = self
            .call::<BlockHeader>(
                "getblockheader",
                &[("blockhash", json!(hash)), ("verbose", json!(true))],
            )
            .await
            .map_err(|e| e.annotate(format!("hash {}", hash)))?;
        block_lookup_result(res, format!("hash {}", hash))
    }

    /// Block with decoded transactions (`getblock` verbosity 2).
    ///
    /// Requires a node that supports verbosity 2.
    pub async fn get_block_full(&self, hash: &str, height: u32) -> Result<Block> {
        let hash = self.resolve_block_hash(hash, height).await?;
        debug!("rpc: getblock (verbosity=2) {}", hash);
        let res = self
            .call::<Block>(
                "getblock",
                &[("blockhash", json!(hash)), ("verbosity", json!(2))],
            )
            .await
            .map_err(|e| e.annotate(format!("hash {}", hash)))?;
        block_lookup_result(res, format!("hash {}", hash))
    }

    /// Decoded transaction (`getrawtransaction` verbose)
    pub async fn get_transaction(&self, txid: &str) -> Result<Tx> {
        debug!("rpc: getrawtransaction {}", txid);
        let res = self
            .call::<Tx>(
                "getrawtransaction",
                &[("txid", json!(txid)), ("verbose", json!(1))],
            )
            .await
            .map_err(|e| e.annotate(format!("txid {}", txid)))?;
        res.into_result("getrawtransaction")
            .map_err(|e| e.annotate(format!("txid {}", txid)))
    }

    /// Ids of transactions in the node's mempool
    pub async fn get_mempool_transactions(&self) -> Result<Vec<String>> {
        debug!("rpc: getrawmempool");
        self.call::<Vec<String>>("getrawmempool", &[])
            .await?
            .into_result("getrawmempool")
    }

    /// Broadcast a raw transaction, returning its txid
    pub async fn send_raw_transaction(&self, tx_hex: &str) -> Result<String> {
        debug!("rpc: sendrawtransaction");
        let res = self
            .call::<String>("sendrawtransaction", &[("hexstring", json!(tx_hex))])
            .await?;
        res.into_result("sendrawtransaction")
            .map_err(|e| e.annotate("sendrawtransaction"))
    }
}

fn block_lookup_result<R>(res: RpcResponse<R>, what: String) -> Result<R> {
    match res.error {
        Some(e) if e.is_block_not_found() => Err(Error::BlockNotFound(what)),
        Some(e) => Err(Error::Rpc(e).annotate(what)),
        None => res.result.ok_or(Error::EmptyResult(what)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Tip {
        height: u32,
    }

    fn decode<R: DeserializeOwned>(body: Value) -> RpcResponse<R> {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_envelope_without_error_field() {
        let res: RpcResponse<Tip> = decode(json!({"result": {"height": 7}}));
        assert!(res.error.is_none());
        assert_eq!(res.into_result("getblockcount").unwrap(), Tip { height: 7 });
    }

    #[test]
    fn test_envelope_without_result_field() {
        let res: RpcResponse<Tip> = decode(json!({"error": {"code": -5, "message": "x"}}));
        assert!(res.result.is_none());
        assert!(matches!(
            res.into_result("getblock"),
            Err(Error::Rpc(RpcError { code: -5, .. }))
        ));
    }

    #[test]
    fn test_empty_envelope() {
        let res: RpcResponse<Tip> = decode(json!({}));
        assert!(matches!(
            res.into_result("getbestblockhash"),
            Err(Error::EmptyResult(_))
        ));
    }
}
