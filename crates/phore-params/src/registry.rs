//! Chain-parameter registry
//!
//! Every network is registered at most once per registry. The process-wide
//! instance is available through [`ChainParamsRegistry::global`], but callers
//! are expected to hold an `Arc` and pass it to the components that need it.

use crate::network::{NetworkMagic, NetworkParams};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

static GLOBAL_REGISTRY: Lazy<Arc<ChainParamsRegistry>> =
    Lazy::new(|| Arc::new(ChainParamsRegistry::new()));

/// Thread-safe map of registered networks, keyed by magic
#[derive(Debug, Default)]
pub struct ChainParamsRegistry {
    networks: RwLock<HashMap<NetworkMagic, Arc<NetworkParams>>>,
}

impl ChainParamsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn global() -> Arc<ChainParamsRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Register a network.
    ///
    /// Fails with [`Error::DuplicateNet`] if the magic is already taken.
    pub fn register(&self, params: NetworkParams) -> Result<Arc<NetworkParams>> {
        let mut networks = self.networks.write();
        Self::insert(&mut networks, params)
    }

    /// Register a batch of networks under one lock.
    ///
    /// Entries already registered with identical parameters are skipped, so
    /// concurrent first-time callers agree on a single registration. An
    /// entry whose magic is taken by different parameters fails the whole
    /// batch with [`Error::DuplicateNet`] and nothing is inserted.
    pub fn register_all(&self, batch: Vec<NetworkParams>) -> Result<()> {
        let mut networks = self.networks.write();
        for params in &batch {
            if let Some(existing) = networks.get(&params.net) {
                if **existing != *params {
                    return Err(Error::DuplicateNet(params.net.0));
                }
            }
        }
        for params in batch {
            if !networks.contains_key(&params.net) {
                Self::insert(&mut networks, params)?;
            }
        }
        Ok(())
    }

    fn insert(
        networks: &mut HashMap<NetworkMagic, Arc<NetworkParams>>,
        params: NetworkParams,
    ) -> Result<Arc<NetworkParams>> {
        if networks.contains_key(&params.net) {
            return Err(Error::DuplicateNet(params.net.0));
        }
        debug!("registering chain params {} ({})", params.name, params.net);
        let params = Arc::new(params);
        networks.insert(params.net, Arc::clone(&params));
        Ok(params)
    }

    /// Check whether a network with the same magic is registered
    pub fn is_registered(&self, params: &NetworkParams) -> bool {
        self.networks.read().contains_key(&params.net)
    }

    /// Look up a registered network by magic
    pub fn lookup(&self, net: NetworkMagic) -> Option<Arc<NetworkParams>> {
        self.networks.read().get(&net).map(Arc::clone)
    }

    /// Number of registered networks
    pub fn len(&self) -> usize {
        self.networks.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.networks.read().is_empty()
    }
}

/// Resolve Phore parameters for a chain name reported by the backend.
///
/// Registers the main and test networks on first use. `"test"` selects
/// testnet; any other name, including unknown ones, selects mainnet.
///
/// # Panics
///
/// Panics if registration fails: the indexer cannot run against an
/// inconsistent registry.
pub fn get_chain_params(registry: &ChainParamsRegistry, chain: &str) -> Arc<NetworkParams> {
    let main = NetworkParams::mainnet();
    let test = NetworkParams::testnet();
    let (main_net, test_net) = (main.net, test.net);

    if !registry.is_registered(&main) || !registry.is_registered(&test) {
        if let Err(e) = registry.register_all(vec![main, test]) {
            panic!("failed to register Phore chain params: {}", e);
        }
    }

    let net = match chain {
        "test" => test_net,
        _ => main_net,
    };
    match registry.lookup(net) {
        Some(params) => params,
        None => panic!("chain params {} missing from registry", net),
    }
}
