use serde::{Deserialize, Serialize};

/// Token descriptor returned by `GET /api/token`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenData {
    pub token_name: String,
    pub symbol: String,
    pub initial_supply: f64,
    pub owner: String,
    /// Unix seconds
    pub creation_time: f64,
    /// Present on some backends; read by the token ticker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<f64>,
}

/// Body of `POST /api/token/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenRequest {
    pub initial_supply: u64,
    pub owner_address: String,
}

impl CreateTokenRequest {
    pub fn new(initial_supply: u64, owner_address: impl Into<String>) -> Self {
        Self {
            initial_supply,
            owner_address: owner_address.into(),
        }
    }
}

/// Successful `POST /api/token/create` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenCreated {
    pub status: String,
    pub token: TokenData,
}
