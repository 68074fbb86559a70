use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::blockchain::{Block, Ledger};
use crate::network::{ConsensusResolver, HttpChainFetcher, PeerRegistry};
use crate::transaction::Transaction;

/// Shared node state: the single ledger, the peer set and the resolver.
///
/// Writers take the `ledger` lock for one indivisible step (queue, seal,
/// replace); proof-of-work runs outside it.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub peers: Mutex<PeerRegistry>,
    pub node_id: String,
    pub resolver: ConsensusResolver<HttpChainFetcher>,
}

impl AppState {
    pub fn new(node_id: impl Into<String>, fetcher: HttpChainFetcher) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            peers: Mutex::new(PeerRegistry::new()),
            node_id: node_id.into(),
            resolver: ConsensusResolver::new(fetcher),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct MempoolResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub replaced: bool,
    pub message: String,
    pub length: usize,
    pub chain: Vec<Block>,
}
