//! In-memory view state mirrored from backend responses.

use sierpinski_api_client::{
    BlockData, ChainData, MiningReward, MiningStats, PeerData, TokenData, TokenomicsData,
    Transaction, WalletData,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything the dashboard renders.
///
/// Poll loops and actions write into it under a short write lock; the renderer
/// reads a cloned snapshot.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    // Token
    pub token: Option<TokenData>,
    pub token_error: Option<String>,
    pub creating_token: bool,

    // Wallet
    pub wallet: Option<WalletData>,
    pub balance: f64,
    pub transactions: Vec<Transaction>,
    pub wallet_error: Option<String>,
    pub creating_wallet: bool,

    // Transfer form
    pub transfer_recipient: String,
    pub transfer_amount: String,
    pub transfer_error: Option<String>,
    pub transferring: bool,

    // Tokenomics and rewards
    pub tokenomics: Option<TokenomicsData>,
    pub rewards: Vec<MiningReward>,

    // Mining and network
    pub stats: MiningStats,
    pub is_mining: bool,
    pub peers: Vec<PeerData>,
    pub peer_error: Option<String>,
    pub adding_peer: bool,
    pub chain: ChainData,
    pub latest_blocks: Vec<BlockData>,
}

/// Shared handle to the view state.
pub type SharedState = Arc<RwLock<DashboardState>>;

/// Busy flags guarding the mutating actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Busy {
    CreatingToken,
    CreatingWallet,
    Transferring,
    AddingPeer,
}

impl DashboardState {
    pub fn busy_flag(&mut self, busy: Busy) -> &mut bool {
        match busy {
            Busy::CreatingToken => &mut self.creating_token,
            Busy::CreatingWallet => &mut self.creating_wallet,
            Busy::Transferring => &mut self.transferring,
            Busy::AddingPeer => &mut self.adding_peer,
        }
    }

    /// True when the transfer form can be submitted.
    pub fn transfer_ready(&self) -> bool {
        self.wallet.is_some()
            && !self.transferring
            && !self.transfer_recipient.is_empty()
            && !self.transfer_amount.is_empty()
    }
}

/// Integer prefix of `input`, the way a lenient integer parse reads it.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. `None` when no digit follows.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
