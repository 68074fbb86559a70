use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hasher;
use crate::transaction::Transaction;

/// A sealed entry of the ledger.
///
/// Blocks are only built by the `Ledger` when sealing, and never mutated
/// afterwards. The same serialized form is used for hashing and for the
/// chain exchanged with peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// Seconds since the Unix epoch, with sub-second precision.
    pub timestamp: f64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: now_secs(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 of the block's canonical serialization.
    pub fn hash(&self) -> String {
        hasher::hash(self)
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
