use serde::{Deserialize, Serialize};

/// Wallet handed out by `POST /api/wallet/create`. Held in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletData {
    pub address: String,
    pub private_key: String,
}

/// `POST /api/wallet/create` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletCreated {
    pub status: String,
    pub address: String,
    pub private_key: String,
}

impl From<WalletCreated> for WalletData {
    fn from(created: WalletCreated) -> Self {
        Self {
            address: created.address,
            private_key: created.private_key,
        }
    }
}

/// `GET /api/wallet/balance/{address}` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceResponse {
    pub status: String,
    pub balance: f64,
}

/// A wallet history entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub timestamp: f64,
    pub hash: String,
}

impl Transaction {
    /// True when `address` sent this transaction.
    pub fn is_outgoing(&self, address: &str) -> bool {
        self.from == address
    }
}

/// `GET /api/wallet/history/{address}` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryResponse {
    pub status: String,
    pub transactions: Vec<Transaction>,
}

/// Body of `POST /api/wallet/transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_address: String,
    pub to_address: String,
    pub amount: i64,
    pub private_key: String,
}

impl TransferRequest {
    /// Builds a transfer from `wallet` to `to_address`.
    pub fn from_wallet(wallet: &WalletData, to_address: impl Into<String>, amount: i64) -> Self {
        Self {
            from_address: wallet.address.clone(),
            to_address: to_address.into(),
            amount,
            private_key: wallet.private_key.clone(),
        }
    }
}
