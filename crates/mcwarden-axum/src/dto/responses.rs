//! Response bodies.

use mcwarden_core::{BanEntry, OperatorEntry, StatusSnapshot};
use serde::{Deserialize, Serialize};

/// `{ success, message }`, used for every mutation and every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Status snapshot plus the address players connect to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(flatten)]
    pub snapshot: StatusSnapshot,
    /// Lifecycle phase: `idle`, `starting`, `running` or `stopping`.
    pub phase: String,
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsResponse {
    pub success: bool,
    pub ops: Vec<OperatorEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BansResponse {
    pub success: bool,
    pub bans: Vec<BanEntry>,
}
