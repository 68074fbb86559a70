use crate::blockchain::{Ledger, pow};
use crate::transaction::Transaction;

/// Solve the puzzle for the current tip and seal a block rewarding `miner`.
pub fn mine_once(ledger: &mut Ledger, miner: &str) {
    let target = ledger.mining_target().unwrap();
    let proof = pow::solve(target.last_proof, &target.last_hash);
    ledger
        .seal_mined_block(&target, proof, Transaction::reward(miner))
        .unwrap();
}

/// A ledger mined up to `len` blocks, genesis included.
pub fn mined_ledger(len: usize) -> Ledger {
    let mut ledger = Ledger::new();
    while ledger.len() < len {
        mine_once(&mut ledger, "test-miner");
    }
    ledger
}
