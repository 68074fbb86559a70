//! Canonical block hashing.
//!
//! Blocks are rendered as JSON with object keys in sorted order before being
//! digested, so two nodes hashing the same block always agree. `serde_json`
//! backs `Value::Object` with a `BTreeMap` (the `preserve_order` feature must
//! stay off), which gives the sorted order for free.

use sha2::{Digest, Sha256};

use super::Block;

/// Sorted-key JSON rendering of `block`, the exact preimage of [`hash`].
pub fn canonical_json(block: &Block) -> String {
    let value = serde_json::to_value(block).expect("blocks always serialize to JSON");
    value.to_string()
}

/// Lowercase hex SHA-256 of the block's canonical JSON.
pub fn hash(block: &Block) -> String {
    sha256_hex(canonical_json(block).as_bytes())
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
