//! Backend configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default node RPC endpoint
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:11772";
/// Default RPC timeout in seconds
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 25;

/// Coin backend configuration, as found in the coin's JSON config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Coin display name
    pub coin_name: String,
    /// Ticker
    pub coin_shortcut: String,
    /// Node RPC URL
    pub rpc_url: String,
    /// RPC user
    pub rpc_user: String,
    /// RPC password
    pub rpc_pass: String,
    /// RPC timeout in seconds
    pub rpc_timeout: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            coin_name: "Phore".to_string(),
            coin_shortcut: "PHR".to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_user: String::new(),
            rpc_pass: String::new(),
            rpc_timeout: DEFAULT_RPC_TIMEOUT_SECS,
        }
    }
}

impl RpcConfig {
    /// Parse from a JSON config value
    pub fn from_json(config: &serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(config.clone())
            .map_err(|e| Error::Config(format!("invalid backend config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&value)
    }

    /// RPC timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout)
    }

    fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(Error::Config("rpc_url must not be empty".to_string()));
        }
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "rpc_url '{}' must be an http(s) URL",
                self.rpc_url
            )));
        }
        if self.rpc_timeout == 0 {
            return Err(Error::Config("rpc_timeout must be positive".to_string()));
        }
        Ok(())
    }
}
