pub mod client;
pub mod consensus;
pub mod peers;

pub use client::HttpChainFetcher;
pub use consensus::{ChainFetcher, ConsensusResolver};
pub use peers::PeerRegistry;
