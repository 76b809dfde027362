//! Mempool transaction-id set

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Ids of unconfirmed transactions last reported by the node
#[derive(Debug, Default)]
pub struct Mempool {
    txids: RwLock<HashSet<String>>,
    initialized: AtomicBool,
}

impl Mempool {
    /// Create an empty, uninitialized mempool
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a first sync has happened
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Replace the contents with the node's current list.
    ///
    /// Returns the number of txids added since the previous sync.
    pub fn replace(&self, txids: Vec<String>) -> usize {
        let next: HashSet<String> = txids.into_iter().collect();
        let mut current = self.txids.write();
        let added = next.difference(&current).count();
        *current = next;
        self.initialized.store(true, Ordering::Release);
        added
    }

    /// Check if a transaction is in the mempool
    pub fn contains(&self, txid: &str) -> bool {
        self.txids.read().contains(txid)
    }

    /// Number of transactions
    pub fn len(&self) -> usize {
        self.txids.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.txids.read().is_empty()
    }
}
