//! Fixed-difficulty proof-of-work.
//!
//! A proof `p` is valid for `(last_proof, last_hash)` when
//! `sha256(format!("{last_proof}{p}{last_hash}"))` starts with
//! [`DIFFICULTY_PREFIX`]. Solving is an ascending search from zero, so the
//! returned proof is always the smallest valid one.

use super::hasher::sha256_hex;

/// Required prefix of the puzzle digest (four hex zeros, about 1 in 65536).
pub const DIFFICULTY_PREFIX: &str = "0000";

/// How many candidates `solve_cancellable` tries between cancellation polls.
pub const CANCEL_CHECK_INTERVAL: u64 = 10_000;

/// Whether `proof` solves the puzzle bound to `last_proof` and `last_hash`.
pub fn valid_proof(last_proof: u64, proof: u64, last_hash: &str) -> bool {
    let guess = format!("{last_proof}{proof}{last_hash}");
    sha256_hex(guess.as_bytes()).starts_with(DIFFICULTY_PREFIX)
}

/// Smallest proof solving the puzzle. Unbounded; blocks until found.
pub fn solve(last_proof: u64, last_hash: &str) -> u64 {
    solve_cancellable(last_proof, last_hash, || false).expect("search is never cancelled")
}

/// Same search as [`solve`], polling `is_cancelled` before the first
/// candidate and every [`CANCEL_CHECK_INTERVAL`] candidates after that.
/// Returns `None` once cancelled.
pub fn solve_cancellable(
    last_proof: u64,
    last_hash: &str,
    is_cancelled: impl Fn() -> bool,
) -> Option<u64> {
    let mut proof = 0;
    loop {
        if proof % CANCEL_CHECK_INTERVAL == 0 && is_cancelled() {
            return None;
        }
        if valid_proof(last_proof, proof, last_hash) {
            return Some(proof);
        }
        proof += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{CANCEL_CHECK_INTERVAL, solve, solve_cancellable, valid_proof};
    use std::cell::Cell;

    #[test]
    fn solved_proof_is_valid_and_smallest() {
        for (last_proof, last_hash) in [(100, "1"), (35_293, "abc"), (0, "")] {
            let proof = solve(last_proof, last_hash);
            assert!(valid_proof(last_proof, proof, last_hash));
            assert!((0..proof).all(|p| !valid_proof(last_proof, p, last_hash)));
        }
    }

    #[test]
    fn proof_is_bound_to_last_hash() {
        let proof = solve(100, "1");
        assert!(
            ["2", "3", "4", "5"]
                .iter()
                .any(|h| !valid_proof(100, proof, h))
        );
    }

    #[test]
    fn solve_matches_linear_scan() {
        let expected = (0u64..).find(|p| valid_proof(7, *p, "x")).unwrap();
        assert_eq!(solve(7, "x"), expected);
        assert_eq!(solve_cancellable(7, "x", || false), Some(expected));
    }

    #[test]
    fn cancelled_before_start_returns_none() {
        assert_eq!(solve_cancellable(7, "x", || true), None);
    }

    #[test]
    fn cancellation_is_polled_periodically() {
        let polls = Cell::new(0u64);
        let result = solve_cancellable(7, "x", || {
            polls.set(polls.get() + 1);
            polls.get() > 1
        });
        let solution = solve(7, "x");
        if solution < CANCEL_CHECK_INTERVAL {
            assert_eq!(result, Some(solution));
        } else {
            assert_eq!(result, None);
        }
    }
}
