pub mod block;
pub mod hasher;
pub mod ledger;
pub mod miner;
pub mod pow;

pub use block::Block;
pub use ledger::{Ledger, MiningTarget, TipWatch};
pub use miner::mine_next_block;
