//! Wire models for the backend API.
//!
//! Every response type defaults missing fields so partially filled responses
//! still decode; the backend is trusted for everything else.

mod ledger;
mod network;
mod rewards;
mod stats;
mod token;
mod wallet;

pub use ledger::{latest_blocks, BlockData, ChainData, ChainValidation, LedgerResponse};
pub use network::{AddPeerRequest, PeerData, PeerStatus, PeersResponse};
pub use rewards::{MiningReward, RewardsResponse, TokenomicsData};
pub use stats::{MiningStats, StatsUpdate, ValidTriangle};
pub use token::{CreateTokenRequest, TokenCreated, TokenData};
pub use wallet::{
    BalanceResponse, HistoryResponse, Transaction, TransferRequest, WalletCreated, WalletData,
};

/// Number of recent blocks the dashboard keeps from the ledger.
pub const LATEST_BLOCKS: usize = 5;
