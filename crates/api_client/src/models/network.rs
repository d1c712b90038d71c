use serde::{Deserialize, Serialize};
use std::fmt;

/// `GET /api/peers` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeersResponse {
    pub peers: Vec<String>,
}

/// Body of `POST /api/peers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPeerRequest {
    pub peer_url: String,
}

/// Client-side connection label. The client never verifies it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerStatus {
    #[default]
    Connected,
    Disconnected,
}

impl fmt::Display for PeerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerStatus::Connected => write!(f, "connected"),
            PeerStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// A peer as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerData {
    pub url: String,
    pub status: PeerStatus,
}

impl PeerData {
    /// Every listed peer is assumed connected.
    pub fn listed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: PeerStatus::Connected,
        }
    }
}

impl From<PeersResponse> for Vec<PeerData> {
    fn from(response: PeersResponse) -> Self {
        response.peers.into_iter().map(PeerData::listed).collect()
    }
}
