use actix_web::{HttpResponse, Responder, get, post, web};
use log::debug;

use super::models::{AppState, MempoolResponse, NewTxRequest, NewTxResponse};

/// Queue a transaction for the next block. Missing fields are rejected by
/// the JSON extractor before this runs.
#[post("/transactions/new/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let NewTxRequest {
        sender,
        recipient,
        amount,
    } = body.into_inner();
    debug!("POST /transactions/new/ - {sender} -> {recipient} ({amount})");

    let index = state
        .ledger
        .lock()
        .expect("mutex poisoned")
        .new_transaction(sender, recipient, amount);

    HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to Block {index}"),
        index,
    })
}

/// List transactions waiting for the next block.
#[get("/mempool/")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(MempoolResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
