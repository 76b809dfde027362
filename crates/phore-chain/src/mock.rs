//! Scripted transport for tests
//!
//! Responses are keyed by method and the request's primary parameter (block
//! hash, txid, height). A `"*"` key matches any parameter.

#![allow(missing_docs)]

use crate::transport::RpcTransport;
use crate::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Named parameters that identify a request, in lookup order
const PRIMARY_PARAMS: &[&str] = &["blockhash", "txid", "height", "hexstring"];

#[derive(Debug, Clone)]
enum Reply {
    Body(Value),
    Fail(String),
}

/// In-memory [`RpcTransport`] with canned replies and a call log
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(String, String), Reply>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(&self, method: &str, key: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .insert((method.to_string(), key.to_string()), reply);
        self
    }

    /// Reply with a successful result
    pub fn on_result(&self, method: &str, key: &str, result: Value) -> &Self {
        self.route(
            method,
            key,
            Reply::Body(json!({"result": result, "error": null})),
        )
    }

    /// Reply with a node error envelope
    pub fn on_rpc_error(&self, method: &str, key: &str, code: i64, message: &str) -> &Self {
        self.route(
            method,
            key,
            Reply::Body(json!({
                "result": null,
                "error": {"code": code, "message": message}
            })),
        )
    }

    /// Fail at the transport level (connection reset, timeout)
    pub fn on_failure(&self, method: &str, key: &str, message: &str) -> &Self {
        self.route(method, key, Reply::Fail(message.to_string()))
    }

    /// Recorded (method, params) pairs in call order
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    /// Number of calls to `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|(m, _)| m == method).count()
    }

    fn primary_key(params: &Value) -> String {
        let value = match params {
            Value::Array(values) => values.first(),
            Value::Object(map) => PRIMARY_PARAMS.iter().find_map(|name| map.get(*name)),
            _ => None,
        };
        match value {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn call(&self, request: Value) -> Result<Value> {
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let params = request["params"].clone();
        let key = Self::primary_key(&params);
        self.calls.lock().push((method.clone(), params));

        let reply = {
            let routes = self.routes.lock();
            routes
                .get(&(method.clone(), key.clone()))
                .or_else(|| routes.get(&(method.clone(), "*".to_string())))
                .cloned()
        };
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(message)) => Err(Error::Transport(message)),
            None => Err(Error::Transport(format!(
                "no mock reply for {} {}",
                method, key
            ))),
        }
    }
}
