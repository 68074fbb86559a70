use log::{debug, info};
use reqwest::Url;
use std::collections::HashSet;

use crate::error::LedgerError;

/// Known peer nodes, stored as canonical `host:port` strings.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer given as `host:port` or as a URL such as
    /// `http://host:port/`. Returns the canonical address that was stored.
    /// Registering a known peer again is a no-op.
    pub fn register(&mut self, address: &str) -> Result<String, LedgerError> {
        let peer = parse_peer_address(address)?;
        if self.peers.insert(peer.clone()) {
            info!("registered peer {peer}");
        } else {
            debug!("peer {peer} already registered");
        }
        Ok(peer)
    }

    /// Snapshot of all known peers.
    pub fn all(&self) -> HashSet<String> {
        self.peers.clone()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Extract the canonical `host:port` of a peer address.
///
/// Input with a scheme keeps only its network location (any path is
/// dropped); a missing port becomes the scheme's default. Bare input must
/// be a network location alone and defaults to port 80.
pub fn parse_peer_address(address: &str) -> Result<String, LedgerError> {
    let invalid = || LedgerError::InvalidAddress(address.to_string());
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let has_scheme = trimmed.contains("://");
    let url = if has_scheme {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    }
    .map_err(|_| invalid())?;

    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid());
    }
    if !has_scheme && (url.path() != "/" || url.query().is_some() || url.fragment().is_some()) {
        return Err(invalid());
    }

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(invalid()),
    };
    // The parser normalizes a scheme's default port away; put it back so
    // the stored address always names the port to connect to.
    let port = url.port_or_known_default().ok_or_else(invalid)?;
    Ok(format!("{host}:{port}"))
}

#[cfg(test)]
mod tests {
    use super::{PeerRegistry, parse_peer_address};
    use crate::error::LedgerError;

    #[test]
    fn registering_twice_keeps_one_entry() {
        let mut peers = PeerRegistry::new();
        peers.register("127.0.0.1:5000").unwrap();
        peers.register("127.0.0.1:5000").unwrap();
        assert_eq!(peers.len(), 1);
    }

    #[test]
    fn url_and_bare_forms_resolve_to_same_peer() {
        let mut peers = PeerRegistry::new();
        assert_eq!(
            peers.register("http://192.168.0.5:5000").unwrap(),
            "192.168.0.5:5000"
        );
        assert_eq!(peers.register("192.168.0.5:5000").unwrap(), "192.168.0.5:5000");
        assert_eq!(peers.len(), 1);
        assert!(peers.all().contains("192.168.0.5:5000"));
    }

    #[test]
    fn url_path_is_dropped() {
        assert_eq!(
            parse_peer_address("http://Node-B.local:5001/api/v1/chain/").unwrap(),
            "node-b.local:5001"
        );
        assert_eq!(parse_peer_address(" localhost:5002 ").unwrap(), "localhost:5002");
        assert_eq!(parse_peer_address("https://peer.example").unwrap(), "peer.example:443");
    }

    #[test]
    fn default_ports_are_kept() {
        assert_eq!(parse_peer_address("http://10.0.0.2:80").unwrap(), "10.0.0.2:80");
        assert_eq!(parse_peer_address("10.0.0.2:80").unwrap(), "10.0.0.2:80");
        assert_eq!(parse_peer_address("10.0.0.2").unwrap(), "10.0.0.2:80");
        assert_eq!(
            parse_peer_address("https://node.example:443/").unwrap(),
            "node.example:443"
        );
    }

    #[test]
    fn unknown_scheme_without_port_is_rejected() {
        assert!(parse_peer_address("gopher2://node.example").is_err());
        assert_eq!(
            parse_peer_address("gopher2://node.example:7000").unwrap(),
            "node.example:7000"
        );
    }

    #[test]
    fn ipv6_hosts_keep_brackets() {
        assert_eq!(parse_peer_address("http://[::1]:5000").unwrap(), "[::1]:5000");
    }

    #[test]
    fn unparseable_addresses_are_rejected() {
        for bad in [
            "",
            "   ",
            "http://",
            "not a host",
            "host:5000/path",
            "mailto:bob@example.com",
            "file:///tmp/chain",
            "host:99999",
        ] {
            let err = parse_peer_address(bad).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAddress(_)), "{bad:?}");
        }
    }

    #[test]
    fn failed_registration_leaves_registry_untouched() {
        let mut peers = PeerRegistry::new();
        assert!(peers.register("http://").is_err());
        assert!(peers.is_empty());
    }
}
