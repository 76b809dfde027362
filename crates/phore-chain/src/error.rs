//! Error types for chain operations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid, missing or duplicate parameter
pub const RPC_INVALID_PARAMETER: i64 = -8;
/// Invalid address or key; nodes also use it for "No information available
/// about transaction"
pub const RPC_INVALID_ADDRESS_OR_KEY: i64 = -5;
/// Client still warming up
pub const RPC_IN_WARMUP: i64 = -28;
/// Transaction or block was rejected by network rules
pub const RPC_VERIFY_REJECTED: i64 = -26;
/// Method not found
pub const RPC_METHOD_NOT_FOUND: i64 = -32601;

/// Error object embedded in a JSON-RPC response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct RpcError {
    /// Numeric error code
    pub code: i64,
    /// Node-supplied message
    pub message: String,
}

impl RpcError {
    /// Create an RPC error
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Classify the error code
    pub fn kind(&self) -> RpcErrorKind {
        RpcErrorKind::from_code(self.code)
    }

    /// Node reports a block hash or height it does not have
    pub fn is_block_not_found(&self) -> bool {
        self.message == "Block not found" || self.message == "Block height out of range"
    }
}

/// Classification of node error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorKind {
    /// Invalid address or key, or no information about a transaction
    InvalidAddressOrKey,
    /// Invalid parameter
    InvalidParameter,
    /// Node still warming up
    InWarmup,
    /// Rejected by network rules
    VerifyRejected,
    /// Unknown method
    MethodNotFound,
    /// Any other code
    Other(i64),
}

impl RpcErrorKind {
    /// Map a node error code to its kind
    pub const fn from_code(code: i64) -> Self {
        match code {
            RPC_INVALID_ADDRESS_OR_KEY => RpcErrorKind::InvalidAddressOrKey,
            RPC_INVALID_PARAMETER => RpcErrorKind::InvalidParameter,
            RPC_IN_WARMUP => RpcErrorKind::InWarmup,
            RPC_VERIFY_REJECTED => RpcErrorKind::VerifyRejected,
            RPC_METHOD_NOT_FOUND => RpcErrorKind::MethodNotFound,
            other => RpcErrorKind::Other(other),
        }
    }
}

impl fmt::Display for RpcErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcErrorKind::InvalidAddressOrKey => write!(f, "InvalidAddressOrKey"),
            RpcErrorKind::InvalidParameter => write!(f, "InvalidParameter"),
            RpcErrorKind::InWarmup => write!(f, "InWarmup"),
            RpcErrorKind::VerifyRejected => write!(f, "VerifyRejected"),
            RpcErrorKind::MethodNotFound => write!(f, "MethodNotFound"),
            RpcErrorKind::Other(code) => write!(f, "Other({})", code),
        }
    }
}

/// Chain errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error reported by the node
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Error with identifying context (hash, height, txid) attached
    #[error("{context}: {source}")]
    Annotated {
        /// What was being looked up
        context: String,
        /// Underlying error
        source: Box<Error>,
    },

    /// HTTP or connection failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Protobuf decode error
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Malformed transaction field
    #[error("Codec error: {0}")]
    Codec(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Block not known to the node
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// Response carried neither result nor error
    #[error("Empty result for {0}")]
    EmptyResult(String),

    /// Backend used before `initialize`
    #[error("Not initialized")]
    NotInitialized,

    /// Parameter lookup or address error
    #[error("Params error: {0}")]
    Params(#[from] phore_params::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap the error with identifying context
    pub fn annotate(self, context: impl Into<String>) -> Self {
        Error::Annotated {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error below any annotation layers
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Error::Annotated { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    /// Node error below any annotation layers
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self.root() {
            Error::Rpc(e) => Some(e),
            _ => None,
        }
    }

    /// Check if the root cause is a transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self.root(), Error::Transport(_))
    }
}
