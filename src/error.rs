use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid peer address: {0:?}")]
    InvalidAddress(String),

    #[error("chain has no blocks")]
    EmptyChain,

    /// The tip moved between taking a mining target and sealing against it.
    #[error("mining target for block #{index} is stale (expected tip {expected}, found {found})")]
    StaleMiningTarget {
        index: u64,
        expected: String,
        found: String,
    },

    #[error("failed to fetch chain from peer {address}: {reason}")]
    PeerFetch { address: String, reason: String },

    #[error("proof {proof} does not solve the puzzle for block #{index}")]
    InvalidProof { index: u64, proof: u64 },

    #[error("mining gave up after {0} attempts, the tip kept moving")]
    MiningAborted(usize),
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            LedgerError::StaleMiningTarget { .. } | LedgerError::MiningAborted(_) => {
                StatusCode::CONFLICT
            }
            LedgerError::PeerFetch { .. } => StatusCode::BAD_GATEWAY,
            LedgerError::EmptyChain | LedgerError::InvalidProof { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
