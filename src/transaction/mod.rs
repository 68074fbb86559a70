pub mod model;

pub use model::{MINING_REWARD, REWARD_SENDER, Transaction};
