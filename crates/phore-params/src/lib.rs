//! Phore network parameters and chain-parameter registry
//!
//! This crate provides the consensus and encoding constants for the Phore
//! main and test networks, checkpoint data, and the process-wide registry
//! the indexer consults when a backend reports its chain name.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod checkpoints;
pub mod network;
pub mod registry;

pub use address::AddressKind;
pub use checkpoints::{Checkpoint, CheckpointList};
pub use network::{
    compact_to_target, DnsSeed, NetworkMagic, NetworkParams, MAIN_PHORE_NET, TEST_PHORE_NET,
};
pub use registry::{get_chain_params, ChainParamsRegistry};

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A network with the same magic is already registered
    #[error("Duplicate network: {0:#x}")]
    DuplicateNet(u32),

    /// Checkpoints must be strictly increasing by height
    #[error("Checkpoint at height {0} is out of order")]
    CheckpointOrder(u32),

    /// Checkpoint not found
    #[error("No checkpoint found for height {0}")]
    CheckpointNotFound(u32),

    /// Address could not be decoded for this network
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
