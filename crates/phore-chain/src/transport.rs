//! JSON-RPC transport
//!
//! The transport only moves request bodies; it never interprets the
//! `result`/`error` envelope, which is left to [`BitcoinRpc`](crate::BitcoinRpc).

use crate::config::RpcConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Sends one JSON-RPC request body and returns the decoded response body
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Perform the call
    async fn call(&self, request: Value) -> Result<Value>;
}

/// Parameter layout of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonMarshaler {
    /// Positional parameters (`"params": [..]`), required by older nodes
    V1,
    /// Named parameters (`"params": {..}`)
    #[default]
    V2,
}

impl JsonMarshaler {
    /// Build a request body; `params` are given in positional order
    pub fn request(&self, method: &str, params: &[(&str, Value)]) -> Value {
        let params = match self {
            JsonMarshaler::V1 => Value::Array(params.iter().map(|(_, v)| v.clone()).collect()),
            JsonMarshaler::V2 => Value::Object(
                params
                    .iter()
                    .map(|(name, v)| (name.to_string(), v.clone()))
                    .collect::<Map<String, Value>>(),
            ),
        };
        json!({
            "jsonrpc": "1.0",
            "id": "blockbook",
            "method": method,
            "params": params,
        })
    }
}

/// HTTP transport with basic auth
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    user: String,
    pass: String,
}

impl HttpTransport {
    /// Create a transport from backend configuration
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Transport(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: config.rpc_url.clone(),
            user: config.rpc_user.clone(),
            pass: config.rpc_pass.clone(),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, request: Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.user, Some(&self.pass))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("HTTP error: {}", e)))?;

        // Nodes answer RPC errors with HTTP 500 and a JSON body, so the body
        // is decoded before the status is considered.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("HTTP body: {}", e)))?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(e) if status.is_success() => Err(Error::Json(e)),
            Err(_) => {
                debug!("rpc: non-JSON response with status {}", status);
                Err(Error::Transport(format!("HTTP error: {}", status)))
            }
        }
    }
}
