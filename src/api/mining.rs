use actix_web::{HttpResponse, post, web};
use log::info;

use super::models::{AppState, MineResponse};
use crate::blockchain::mine_next_block;

/// Mine the next block on the blocking pool, so chain queries and peer
/// registration stay responsive meanwhile. The block carries the pending
/// pool plus a reward for this node.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> actix_web::Result<HttpResponse> {
    let worker = state.clone();
    let block = web::block(move || mine_next_block(&worker.ledger, &worker.node_id)).await??;

    info!(
        "MINER - forged block #{} (proof={}, txs={})",
        block.index,
        block.proof,
        block.transactions.len()
    );
    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New Block Forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}
