//! A minimal proof-of-work ledger node.
//!
//! [`blockchain`] holds the chain model, hashing, the puzzle and mining;
//! [`network`] holds the peer set and longest-valid-chain resolution;
//! [`api`] exposes both over HTTP.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod network;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod transaction;
