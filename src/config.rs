use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Node settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Identity that mining rewards are credited to.
    pub node_id: String,
    /// Peers registered at startup.
    pub peers: Vec<String>,
    /// Background consensus period; `None` disables it.
    pub resolve_interval: Option<Duration>,
    pub peer_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 5000u16);
        let node_id = lookup("NODE_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let peers: Vec<String> = lookup("PEERS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let resolve_secs = parse_or(&lookup, "RESOLVE_INTERVAL_SECS", 0u64);
        let timeout_secs = parse_or(&lookup, "PEER_TIMEOUT_SECS", 5u64).max(1);

        Self {
            host,
            port,
            node_id,
            peers,
            resolve_interval: (resolve_secs > 0).then(|| Duration::from_secs(resolve_secs)),
            peer_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} is not valid, using {default}");
            default
        }),
    }
}
