use serde::{Deserialize, Serialize};

/// A mining reward record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningReward {
    pub cell_location: serde_json::Value,
    pub miner: String,
    pub amount: f64,
    pub timestamp: f64,
    pub transaction: String,
}

/// `GET /api/rewards` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsResponse {
    pub status: String,
    pub rewards: Vec<MiningReward>,
}

/// `GET /api/tokenomics` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenomicsData {
    pub total_supply: f64,
    pub holder_count: f64,
    pub transaction_count: f64,
    pub mining_reward: f64,
    pub node_wallet: String,
    pub node_balance: f64,
}
