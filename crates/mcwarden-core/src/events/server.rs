//! Wire events relayed to control-plane subscribers.

use serde::{Deserialize, Serialize};

use crate::state::StatusSnapshot;

/// Payload of a `log` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    /// One console line, without the trailing newline.
    pub message: String,
}

/// Payload of `playerJoin` / `playerLeave` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    /// Player name as printed by the server.
    pub player: String,
}

/// Event envelope broadcast to viewers.
///
/// Serialized adjacently tagged so the control plane can forward it
/// untouched: `{ "type": "status", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Fresh status snapshot (running flag, player count, uptime).
    Status(StatusSnapshot),
    /// Raw console output.
    Log(LogMessage),
    /// A player joined.
    PlayerJoin(PlayerRef),
    /// A player left.
    PlayerLeave(PlayerRef),
}

impl ServerEvent {
    /// Create a status event.
    pub const fn status(snapshot: StatusSnapshot) -> Self {
        Self::Status(snapshot)
    }

    /// Create a log event.
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log(LogMessage {
            message: message.into(),
        })
    }

    /// Create a player join event.
    pub fn player_join(player: impl Into<String>) -> Self {
        Self::PlayerJoin(PlayerRef {
            player: player.into(),
        })
    }

    /// Create a player leave event.
    pub fn player_leave(player: impl Into<String>) -> Self {
        Self::PlayerLeave(PlayerRef {
            player: player.into(),
        })
    }

    /// The wire `type` discriminant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Log(_) => "log",
            Self::PlayerJoin(_) => "playerJoin",
            Self::PlayerLeave(_) => "playerLeave",
        }
    }
}
