use serde::{Deserialize, Serialize};

/// Sender used for block rewards, which mint value out of nothing.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the miner of each block.
pub const MINING_REWARD: f64 = 1.0;

/// A transfer waiting in the pool or sealed into a block.
///
/// Fields are not validated: any sender/recipient string and any amount,
/// negative included, is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// The reward transaction credited to `node_id` for mining a block.
    pub fn reward(node_id: &str) -> Self {
        Self::new(REWARD_SENDER, node_id, MINING_REWARD)
    }

    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }
}
