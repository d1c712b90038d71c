use serde::{Deserialize, Serialize};

/// `POST /api/chain/validate` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainValidation {
    pub height: u64,
    pub last_block_hash: String,
    pub valid: bool,
}

/// Chain summary shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainData {
    pub height: u64,
    pub last_block_hash: String,
    pub is_valid: bool,
}

impl Default for ChainData {
    /// An unknown chain is shown as valid until the backend says otherwise.
    fn default() -> Self {
        Self {
            height: 0,
            last_block_hash: String::new(),
            is_valid: true,
        }
    }
}

impl From<ChainValidation> for ChainData {
    fn from(validation: ChainValidation) -> Self {
        Self {
            height: validation.height,
            last_block_hash: validation.last_block_hash,
            is_valid: validation.valid,
        }
    }
}

/// A ledger cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockData {
    pub position: [f64; 2],
    pub transaction_hash: String,
    /// Empty or absent for the genesis cell
    pub prev_hash: Option<String>,
    pub parent_refs: Vec<[f64; 2]>,
    pub child_ptrs: Vec<[f64; 2]>,
    pub metadata: serde_json::Value,
    pub timestamp: f64,
    pub geometric_coords: Vec<[f64; 2]>,
}

impl BlockData {
    /// Previous hash, `None` for genesis.
    pub fn previous(&self) -> Option<&str> {
        self.prev_hash.as_deref().filter(|hash| !hash.is_empty())
    }
}

/// `GET /api/ledger` response: a list of block groups, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerResponse {
    pub ledger: Vec<Vec<BlockData>>,
}

/// Collects up to `limit` blocks from the newest groups.
///
/// Groups are visited newest first, over at most the last `limit` groups;
/// blocks inside a group keep their order.
pub fn latest_blocks(ledger: &[Vec<BlockData>], limit: usize) -> Vec<BlockData> {
    ledger
        .iter()
        .rev()
        .take(limit)
        .flat_map(|group| group.iter().cloned())
        .take(limit)
        .collect()
}
