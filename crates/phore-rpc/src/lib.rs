//! Phore coin backend
//!
//! Wraps the generic Bitcoin-family RPC client and codec from `phore-chain`
//! with the Phore network parameters. Phore nodes only accept positional
//! RPC parameters and cannot return a block with decoded transactions, so
//! blocks are assembled from `getblock` txids and per-transaction lookups.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod parser;
pub mod rpc;

pub use parser::PhoreParser;
pub use rpc::{is_transaction_unavailable, PhoreRpc};
