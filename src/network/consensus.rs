//! Longest-valid-chain conflict resolution.
//!
//! Peers are polled through a [`ChainFetcher`]; the longest chain that is
//! strictly longer than the local one and passes [`is_valid_chain`]
//! replaces the local chain. Equal lengths never replace it.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use super::PeerRegistry;
use crate::blockchain::{Block, Ledger, pow};
use crate::error::LedgerError;

/// A peer's chain as it reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Source of peer chains. Failures skip the peer, they never abort
/// resolution.
pub trait ChainFetcher {
    fn fetch_chain(&self, address: &str) -> impl Future<Output = Result<PeerChain, LedgerError>>;
}

/// Check hash linkage and proofs of every adjacent pair, stopping at the
/// first failure. A lone genesis block is valid; an empty chain is not.
///
/// The puzzle of block `i` is bound to block `i - 1`'s own `previous_hash`
/// field, matching how blocks are mined.
///
/// Indices are not checked. The ledger numbers new blocks by chain length
/// while mining targets use `last.index + 1`; both agree only because every
/// honest chain starts at index 1 and counts up by one. A gapped chain
/// adopted from a peer would make them disagree, so stale-target detection
/// would then reject every mined block until the chain is replaced again.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    if chain.is_empty() {
        return false;
    }
    for pair in chain.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if cur.previous_hash != prev.hash() {
            debug!("block #{} does not link to block #{}", cur.index, prev.index);
            return false;
        }
        if !pow::valid_proof(prev.proof, cur.proof, &prev.previous_hash) {
            debug!("block #{} carries an invalid proof {}", cur.index, cur.proof);
            return false;
        }
    }
    true
}

pub struct ConsensusResolver<F> {
    fetcher: F,
}

impl<F: ChainFetcher> ConsensusResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Poll every known peer and adopt the longest valid chain that beats
    /// the local one. Returns whether the local chain was replaced.
    ///
    /// No lock is held while peers are fetched. The replacement itself
    /// happens under the ledger lock, after re-checking that the local chain
    /// did not grow past the candidate in the meantime.
    pub async fn resolve(&self, ledger: &Mutex<Ledger>, peers: &Mutex<PeerRegistry>) -> bool {
        let mut addresses: Vec<String> = peers
            .lock()
            .expect("mutex poisoned")
            .all()
            .into_iter()
            .collect();
        addresses.sort();

        let mut best_len = ledger.lock().expect("mutex poisoned").len();
        let mut candidate: Option<Vec<Block>> = None;

        for address in &addresses {
            let peer = match self.fetcher.fetch_chain(address).await {
                Ok(peer) => peer,
                Err(e) => {
                    warn!("CONSENSUS - skipping peer: {e}");
                    continue;
                }
            };

            if peer.length <= best_len {
                debug!(
                    "CONSENSUS - {address}: length {} does not beat {best_len}",
                    peer.length
                );
                continue;
            }
            if peer.length != peer.chain.len() {
                debug!(
                    "CONSENSUS - {address}: reported length {} but sent {} blocks",
                    peer.length,
                    peer.chain.len()
                );
                continue;
            }
            if !is_valid_chain(&peer.chain) {
                debug!("CONSENSUS - {address}: chain of length {} is invalid", peer.length);
                continue;
            }

            debug!("CONSENSUS - {address}: new best chain, length {}", peer.length);
            best_len = peer.length;
            candidate = Some(peer.chain);
        }

        let Some(chain) = candidate else {
            debug!("CONSENSUS - local chain is authoritative ({} peers polled)", addresses.len());
            return false;
        };

        let mut ledger = ledger.lock().expect("mutex poisoned");
        if chain.len() <= ledger.len() {
            info!(
                "CONSENSUS - local chain grew to {} while polling, keeping it",
                ledger.len()
            );
            return false;
        }
        ledger.replace_chain(chain);
        true
    }
}
