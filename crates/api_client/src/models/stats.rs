use serde::{Deserialize, Serialize};

/// A triangle the backend reports as a valid mining result. Decoration only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidTriangle {
    /// Canvas-space vertices, when the backend supplies them
    pub coordinates: Option<Vec<[f64; 2]>>,
}

impl ValidTriangle {
    /// The three vertices, if present and complete.
    pub fn vertices(&self) -> Option<[[f64; 2]; 3]> {
        match self.coordinates.as_deref() {
            Some([a, b, c, ..]) => Some([*a, *b, *c]),
            _ => None,
        }
    }
}

/// `GET /api/stats` response. Every key is optional; absent keys leave the
/// current snapshot untouched when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsUpdate {
    pub hash_rate: Option<f64>,
    pub blocks_found: Option<f64>,
    pub triangle_count: Option<f64>,
    pub difficulty: Option<f64>,
    pub nonce: Option<f64>,
    pub current_hash: Option<String>,
    pub valid_triangles: Option<Vec<ValidTriangle>>,
    pub network_nodes: Option<f64>,
    pub consensus: Option<f64>,
    pub total_rewards: Option<f64>,
    pub rewards_count: Option<f64>,
    pub average_reward: Option<f64>,
    /// Older backends report the block count under this name.
    #[serde(rename = "total_blocks")]
    pub total_blocks: Option<f64>,
}

/// Mining and network statistics snapshot held by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningStats {
    pub hash_rate: f64,
    pub blocks_found: f64,
    pub triangle_count: f64,
    pub difficulty: f64,
    pub nonce: f64,
    pub current_hash: String,
    pub valid_triangles: Vec<ValidTriangle>,
    pub network_nodes: f64,
    pub consensus: f64,
    pub total_rewards: f64,
    pub rewards_count: f64,
    pub average_reward: f64,
}

impl Default for MiningStats {
    fn default() -> Self {
        Self {
            hash_rate: 0.0,
            blocks_found: 0.0,
            triangle_count: 1.0,
            difficulty: 4.0,
            nonce: 0.0,
            current_hash: String::new(),
            valid_triangles: Vec::new(),
            network_nodes: 3.0,
            consensus: 67.0,
            total_rewards: 0.0,
            rewards_count: 0.0,
            average_reward: 0.0,
        }
    }
}

impl MiningStats {
    /// Shallow-merges a stats response into the snapshot.
    ///
    /// Present keys overwrite; `hashRate` only overwrites when non-zero.
    pub fn merge(&mut self, update: StatsUpdate) {
        if let Some(hash_rate) = update.hash_rate.filter(|rate| *rate != 0.0) {
            self.hash_rate = hash_rate;
        }
        if let Some(blocks) = update.blocks_found {
            self.blocks_found = blocks;
        }
        if let Some(count) = update.triangle_count {
            self.triangle_count = count;
        }
        if let Some(difficulty) = update.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(nonce) = update.nonce {
            self.nonce = nonce;
        }
        if let Some(hash) = update.current_hash {
            self.current_hash = hash;
        }
        if let Some(triangles) = update.valid_triangles {
            self.valid_triangles = triangles;
        }
        if let Some(nodes) = update.network_nodes {
            self.network_nodes = nodes;
        }
        if let Some(consensus) = update.consensus {
            self.consensus = consensus;
        }
        if let Some(total) = update.total_rewards {
            self.total_rewards = total;
        }
        if let Some(count) = update.rewards_count {
            self.rewards_count = count;
        }
        if let Some(average) = update.average_reward {
            self.average_reward = average;
        }
    }

    /// Clears the mining counters, keeping network and reward figures.
    pub fn reset_mining(&mut self) {
        self.hash_rate = 0.0;
        self.blocks_found = 0.0;
        self.triangle_count = 1.0;
        self.nonce = 0.0;
        self.current_hash.clear();
        self.valid_triangles.clear();
    }
}
