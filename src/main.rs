use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};
use std::time::Duration;

use pow_ledger::api::{self, AppState};
use pow_ledger::config::Config;
use pow_ledger::network::HttpChainFetcher;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    println!(
        "⛓️ Starting ledger node {} at http://{}:{}",
        config.node_id, config.host, config.port
    );

    let state = web::Data::new(AppState::new(
        config.node_id.clone(),
        HttpChainFetcher::new(config.peer_timeout),
    ));
    {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        for peer in &config.peers {
            if let Err(e) = peers.register(peer) {
                warn!("ignoring startup peer: {e}");
            }
        }
    }
    if let Some(every) = config.resolve_interval {
        spawn_periodic_resolve(state.clone(), every);
    }

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Poll peers every `every` and adopt a longer valid chain when one exists.
fn spawn_periodic_resolve(state: web::Data<AppState>, every: Duration) {
    info!("resolving against peers every {}s", every.as_secs());
    actix_web::rt::spawn(async move {
        let mut ticker = actix_web::rt::time::interval(every);
        loop {
            ticker.tick().await;
            if state.resolver.resolve(&state.ledger, &state.peers).await {
                let length = state.ledger.lock().expect("mutex poisoned").len();
                info!("CONSENSUS - periodic resolve adopted a chain of length {length}");
            }
        }
    });
}
