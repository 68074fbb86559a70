use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Block, pow};
use crate::error::LedgerError;
use crate::network::consensus;
use crate::transaction::Transaction;

/// `previous_hash` marker of the genesis block. Never a real digest.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Proof stored in the genesis block. Genesis is exempt from verification.
pub const GENESIS_PROOF: u64 = 100;

/// Counter bumped each time the chain tip changes.
///
/// Clones share the counter, so a miner can poll it without taking the
/// ledger lock.
#[derive(Debug, Clone, Default)]
pub struct TipWatch {
    epoch: Arc<AtomicU64>,
}

impl TipWatch {
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub fn has_moved_since(&self, epoch: u64) -> bool {
        self.epoch() != epoch
    }

    fn advance(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

/// Snapshot of the tip that a proof-of-work search runs against.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningTarget {
    /// Index the mined block will get.
    pub index: u64,
    pub last_proof: u64,
    /// Puzzle binding: the `previous_hash` field of the current last block.
    pub last_hash: String,
    /// Hash of the current last block, which the mined block links to.
    pub tip_hash: String,
    /// Tip epoch at snapshot time.
    pub epoch: u64,
}

/// In-memory chain plus the pool of transactions waiting for a block.
///
/// The chain is never empty: construction seals the genesis block.
/// Callers share a ledger behind a `Mutex`; every `&mut self` method is one
/// indivisible step for readers holding that lock.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    tip: TipWatch,
}

impl Ledger {
    /// Initialize a new ledger with a genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            tip: TipWatch::default(),
        };
        ledger.push_block(GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string());
        ledger
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> u64 {
        let tx = Transaction::new(sender, recipient, amount);
        debug!(
            "queued tx {} -> {} ({}), pool size {}",
            tx.sender,
            tx.recipient,
            tx.amount,
            self.pending.len() + 1
        );
        self.pending.push(tx);
        self.chain.last().map_or(1, |b| b.index + 1)
    }

    /// Seal every pending transaction into a new block.
    ///
    /// The block links to `previous_hash`, or to the hash of the current last
    /// block when `None`. The proof is stored as given; use
    /// [`Ledger::seal_mined_block`] to have it checked.
    pub fn seal_block(
        &mut self,
        proof: u64,
        previous_hash: Option<String>,
    ) -> Result<&Block, LedgerError> {
        let previous_hash = match previous_hash {
            Some(h) => h,
            None => self.last_block()?.hash(),
        };
        Ok(self.push_block(proof, previous_hash))
    }

    /// Seal a block mined against `target`, crediting `reward` in it.
    ///
    /// Fails with [`LedgerError::StaleMiningTarget`] when the tip moved since
    /// the target was taken, leaving the pool untouched.
    pub fn seal_mined_block(
        &mut self,
        target: &MiningTarget,
        proof: u64,
        reward: Transaction,
    ) -> Result<Block, LedgerError> {
        let last = self.last_block()?;
        let tip_hash = last.hash();
        if tip_hash != target.tip_hash || last.index + 1 != target.index {
            return Err(LedgerError::StaleMiningTarget {
                index: target.index,
                expected: target.tip_hash.clone(),
                found: tip_hash,
            });
        }
        if !pow::valid_proof(target.last_proof, proof, &target.last_hash) {
            return Err(LedgerError::InvalidProof {
                index: target.index,
                proof,
            });
        }

        self.pending.push(reward);
        Ok(self.push_block(proof, tip_hash).clone())
    }

    /// The most recently appended block.
    pub fn last_block(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    pub fn mining_target(&self) -> Result<MiningTarget, LedgerError> {
        let last = self.last_block()?;
        Ok(MiningTarget {
            index: last.index + 1,
            last_proof: last.proof,
            last_hash: last.previous_hash.clone(),
            tip_hash: last.hash(),
            epoch: self.tip.epoch(),
        })
    }

    pub fn tip_watch(&self) -> TipWatch {
        self.tip.clone()
    }

    /// Swap in a chain adopted from a peer. The pool is kept.
    pub(crate) fn replace_chain(&mut self, chain: Vec<Block>) {
        debug_assert!(!chain.is_empty(), "replacement chain must hold genesis");
        info!(
            "replacing local chain (length {}) with peer chain (length {})",
            self.chain.len(),
            chain.len()
        );
        self.chain = chain;
        self.tip.advance();
    }

    /// Validate the whole local chain: linkage and proofs.
    pub fn is_valid(&self) -> bool {
        consensus::is_valid_chain(&self.chain)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Indices come from the chain length, which equals `last.index + 1`
    /// (what [`Ledger::mining_target`] uses) as long as the chain is
    /// numbered contiguously from 1. Adopted chains are not re-checked for
    /// that; see `consensus::is_valid_chain`.
    fn push_block(&mut self, proof: u64, previous_hash: String) -> &Block {
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(index, transactions, proof, previous_hash);
        info!(
            "sealed block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        self.chain.push(block);
        self.tip.advance();
        &self.chain[self.chain.len() - 1]
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
