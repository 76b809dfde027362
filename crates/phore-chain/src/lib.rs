//! Bitcoin-family chain plumbing shared by coin backends
//!
//! Provides the chain data model, the protobuf transaction codec used for
//! on-disk indexing, and a JSON-RPC client for Bitcoin-compatible nodes.
//! Coin crates wrap these pieces and override what their node does
//! differently.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chain;
pub mod codec;
pub mod config;
pub mod error;
pub mod mempool;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;
pub mod parser;
pub mod rpc;
pub mod transport;
pub mod types;

pub use chain::BlockChain;
pub use codec::{BaseParser, ProtoTransaction};
pub use config::RpcConfig;
pub use error::{Error, Result, RpcError, RpcErrorKind, RPC_INVALID_ADDRESS_OR_KEY};
pub use mempool::Mempool;
pub use parser::{BitcoinParser, BlockChainParser};
pub use rpc::{BitcoinRpc, RpcResponse};
pub use transport::{HttpTransport, JsonMarshaler, RpcTransport};
pub use types::{Block, BlockHeader, ChainInfo, ScriptPubKey, ScriptSig, Tx, Vin, Vout};
