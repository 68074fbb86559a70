use log::{debug, warn};
use std::sync::Mutex;

use super::{Block, Ledger, MiningTarget, TipWatch, pow};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Times mining restarts against a moved tip before giving up.
pub const MAX_MINING_ATTEMPTS: usize = 8;

/// Mine and seal the next block, crediting the reward to `node_id`.
///
/// The ledger lock is only held to snapshot the target and to seal; the
/// proof search runs unlocked and stops early when the tip moves (a seal by
/// another request or a consensus replacement). Blocking: run it off the
/// request path.
pub fn mine_next_block(ledger: &Mutex<Ledger>, node_id: &str) -> Result<Block, LedgerError> {
    mine_with(ledger, node_id, |target, watch| {
        pow::solve_cancellable(target.last_proof, &target.last_hash, || {
            watch.has_moved_since(target.epoch)
        })
    })
}

/// Restart loop around `search`, which returns `None` when it was cancelled.
fn mine_with(
    ledger: &Mutex<Ledger>,
    node_id: &str,
    mut search: impl FnMut(&MiningTarget, &TipWatch) -> Option<u64>,
) -> Result<Block, LedgerError> {
    for attempt in 1..=MAX_MINING_ATTEMPTS {
        let (target, watch) = {
            let ledger = ledger.lock().expect("mutex poisoned");
            (ledger.mining_target()?, ledger.tip_watch())
        };

        let Some(proof) = search(&target, &watch) else {
            debug!(
                "MINER - tip moved while mining block #{} (attempt {attempt}), restarting",
                target.index
            );
            continue;
        };

        let mut ledger = ledger.lock().expect("mutex poisoned");
        match ledger.seal_mined_block(&target, proof, Transaction::reward(node_id)) {
            Ok(block) => return Ok(block),
            Err(e @ LedgerError::StaleMiningTarget { .. }) => {
                warn!("MINER - discarding proof {proof}: {e}");
            }
            Err(e) => return Err(e),
        }
    }
    Err(LedgerError::MiningAborted(MAX_MINING_ATTEMPTS))
}

#[cfg(test)]
mod tests {
    use super::{MAX_MINING_ATTEMPTS, mine_next_block, mine_with};
    use crate::blockchain::{Ledger, pow};
    use crate::error::LedgerError;
    use crate::test_utils::mine_once;
    use std::sync::Mutex;

    #[test]
    fn mines_valid_block_with_reward_and_pool() {
        let ledger = Mutex::new(Ledger::new());
        ledger.lock().unwrap().new_transaction("a", "b", 4.0);

        let block = mine_next_block(&ledger, "miner-1").unwrap();

        assert_eq!(block.index, 2);
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.transactions[1].recipient, "miner-1");
        let ledger = ledger.lock().unwrap();
        assert!(ledger.pending().is_empty());
        assert!(ledger.is_valid());
        assert_eq!(ledger.last_block().unwrap(), &block);
    }

    #[test]
    fn consecutive_mining_extends_chain() {
        let ledger = Mutex::new(Ledger::new());
        mine_next_block(&ledger, "m").unwrap();
        let second = mine_next_block(&ledger, "m").unwrap();
        assert_eq!(second.index, 3);
        assert!(ledger.lock().unwrap().is_valid());
    }

    #[test]
    fn stale_proof_is_discarded_and_mining_restarts_on_new_tip() {
        let ledger = Mutex::new(Ledger::new());
        let mut searches = 0;

        let block = mine_with(&ledger, "me", |target, _| {
            searches += 1;
            let proof = pow::solve(target.last_proof, &target.last_hash);
            if searches == 1 {
                // A rival seals first; this proof now targets a stale tip.
                mine_once(&mut ledger.lock().unwrap(), "rival");
            }
            Some(proof)
        })
        .unwrap();

        assert_eq!(searches, 2);
        let ledger = ledger.lock().unwrap();
        assert_eq!(block.index, 3);
        assert_eq!(block.previous_hash, ledger.chain()[1].hash());
        assert_eq!(ledger.chain()[1].transactions[0].recipient, "rival");
        assert_eq!(block.transactions.len(), 1);
        assert_eq!(block.transactions[0].recipient, "me");
        assert!(ledger.is_valid());
    }

    #[test]
    fn search_is_cancelled_when_tip_moves() {
        let ledger = Mutex::new(Ledger::new());
        let mut outcomes = Vec::new();

        let block = mine_with(&ledger, "me", |target, watch| {
            if outcomes.is_empty() {
                mine_once(&mut ledger.lock().unwrap(), "rival");
            }
            let found = pow::solve_cancellable(target.last_proof, &target.last_hash, || {
                watch.has_moved_since(target.epoch)
            });
            outcomes.push(found);
            found
        })
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0], None);
        assert!(outcomes[1].is_some());
        let ledger = ledger.lock().unwrap();
        assert_eq!(block.index, 3);
        assert_eq!(block.previous_hash, ledger.chain()[1].hash());
        assert!(ledger.is_valid());
    }

    #[test]
    fn gives_up_when_tip_never_settles() {
        let ledger = Mutex::new(Ledger::new());
        let mut searches = 0;

        let err = mine_with(&ledger, "me", |_, _| {
            searches += 1;
            mine_once(&mut ledger.lock().unwrap(), "rival");
            None
        })
        .unwrap_err();

        assert!(matches!(err, LedgerError::MiningAborted(n) if n == MAX_MINING_ATTEMPTS));
        assert_eq!(searches, MAX_MINING_ATTEMPTS);
        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.len(), 1 + MAX_MINING_ATTEMPTS);
        assert!(ledger.chain().iter().flat_map(|b| &b.transactions).all(|t| t.recipient == "rival"));
    }
}
