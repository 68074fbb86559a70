use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, NodesResponse, RegisterNodesRequest, ResolveResponse};
use crate::network::PeerRegistry;
use crate::network::peers::parse_peer_address;

fn sorted_peers(peers: &PeerRegistry) -> Vec<String> {
    let mut all: Vec<String> = peers.all().into_iter().collect();
    all.sort();
    all
}

/// Register a list of peers. The whole list is rejected if any entry fails
/// to parse.
#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> actix_web::Result<HttpResponse> {
    if body.nodes.is_empty() {
        return Ok(HttpResponse::BadRequest().body("Error: Please supply a valid list of nodes"));
    }
    let parsed = body
        .nodes
        .iter()
        .map(|n| parse_peer_address(n))
        .collect::<Result<Vec<_>, _>>()?;

    let mut peers = state.peers.lock().expect("mutex poisoned");
    for address in &parsed {
        peers.register(address)?;
    }
    Ok(HttpResponse::Created().json(NodesResponse {
        message: "New nodes have been added".to_string(),
        total_nodes: sorted_peers(&peers),
    }))
}

#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(NodesResponse {
        message: format!("{} known nodes", peers.len()),
        total_nodes: sorted_peers(&peers),
    })
}

/// Run longest-valid-chain resolution against every known peer.
#[get("/nodes/resolve/")]
pub async fn resolve_conflicts(state: web::Data<AppState>) -> impl Responder {
    let replaced = state.resolver.resolve(&state.ledger, &state.peers).await;

    let ledger = state.ledger.lock().expect("mutex poisoned");
    let message = if replaced {
        info!("CONSENSUS - adopted peer chain of length {}", ledger.len());
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        replaced,
        message: message.to_string(),
        length: ledger.len(),
        chain: ledger.chain().to_vec(),
    })
}
