use log::warn;
use std::time::Duration;

use super::consensus::{ChainFetcher, PeerChain};
use crate::error::LedgerError;

/// Path every node serves its chain on.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// Connection timeout, capped by the overall request timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Fetches peer chains over HTTP: `GET http://{peer}/api/v1/chain/`.
#[derive(Clone)]
pub struct HttpChainFetcher {
    http_client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(DEFAULT_CONNECT_TIMEOUT))
            .build()
            .unwrap_or_else(|e| {
                warn!("peer client setup failed ({e}), falling back to defaults without timeouts");
                reqwest::Client::default()
            });
        Self { http_client }
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, address: &str) -> Result<PeerChain, LedgerError> {
        let fetch_error = |reason: String| LedgerError::PeerFetch {
            address: address.to_string(),
            reason,
        };
        let url = format!("http://{address}{CHAIN_PATH}");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                fetch_error(format!("request timed out: {e}"))
            } else if e.is_connect() {
                fetch_error(format!("connection failed: {e}"))
            } else {
                fetch_error(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP status {}", response.status())));
        }

        response
            .json::<PeerChain>()
            .await
            .map_err(|e| fetch_error(format!("malformed chain response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::HttpChainFetcher;
    use crate::error::LedgerError;
    use crate::network::ChainFetcher;
    use std::time::Duration;

    #[actix_web::test]
    async fn unreachable_peer_is_a_fetch_error() {
        let fetcher = HttpChainFetcher::new(Duration::from_secs(2));
        let err = fetcher.fetch_chain("127.0.0.1:1").await.unwrap_err();
        match err {
            LedgerError::PeerFetch { address, .. } => assert_eq!(address, "127.0.0.1:1"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
