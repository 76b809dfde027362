//! Trusted chain anchors

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A blockchain checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Block height
    pub height: u32,
    /// Block hash (hex, display order)
    pub hash: String,
}

impl Checkpoint {
    /// Create a checkpoint
    pub fn new(height: u32, hash: impl Into<String>) -> Self {
        Self {
            height,
            hash: hash.into(),
        }
    }
}

/// Ordered list of checkpoints, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointList {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointList {
    /// Create a checkpoint list.
    ///
    /// Heights must be strictly increasing; the list is not reordered.
    pub fn new(checkpoints: Vec<Checkpoint>) -> Result<Self> {
        for pair in checkpoints.windows(2) {
            if pair[1].height <= pair[0].height {
                return Err(Error::CheckpointOrder(pair[1].height));
            }
        }
        Ok(Self { checkpoints })
    }

    /// An empty list
    pub const fn empty() -> Self {
        Self {
            checkpoints: Vec::new(),
        }
    }

    /// Get checkpoint at or before given height
    pub fn checkpoint_at_height(&self, height: u32) -> Result<&Checkpoint> {
        // partition_point relies on the ordering enforced in `new`
        let idx = self.checkpoints.partition_point(|cp| cp.height <= height);
        if idx == 0 {
            return Err(Error::CheckpointNotFound(height));
        }
        Ok(&self.checkpoints[idx - 1])
    }

    /// Checkpoint pinned at exactly this height, if any
    pub fn get(&self, height: u32) -> Option<&Checkpoint> {
        self.checkpoints
            .binary_search_by_key(&height, |cp| cp.height)
            .ok()
            .map(|idx| &self.checkpoints[idx])
    }

    /// Get all checkpoints
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Get latest checkpoint
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    /// Get checkpoint count
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}
