//! Authoritative in-memory view of the game server.
//!
//! `ServerState` is owned by the supervisor and mutated only from its
//! event-processing path. Everyone else gets a [`StatusSnapshot`] copy.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mutable server state.
///
/// Invariant: when `running` is false the roster is empty and there is no
/// start timestamp. [`ServerState::reset`] is the only way back to that
/// state, and joins are refused while not running.
#[derive(Debug, Clone)]
pub struct ServerState {
    running: bool,
    started_at: Option<(DateTime<Utc>, Instant)>,
    players: BTreeSet<String>,
    max_players: u32,
}

impl ServerState {
    /// Create an idle state.
    pub const fn new(max_players: u32) -> Self {
        Self {
            running: false,
            started_at: None,
            players: BTreeSet::new(),
            max_players,
        }
    }

    /// Record that the server became ready.
    pub fn mark_started(&mut self) {
        self.running = true;
        self.started_at = Some((Utc::now(), Instant::now()));
    }

    /// Clear everything; the server is gone.
    pub fn reset(&mut self) {
        self.running = false;
        self.started_at = None;
        self.players.clear();
    }

    /// Add a player to the roster.
    ///
    /// Returns `true` if the roster changed. Re-adding a known player and
    /// joins while not running are no-ops.
    pub fn player_joined(&mut self, name: &str) -> bool {
        if !self.running {
            return false;
        }
        self.players.insert(name.to_string())
    }

    /// Remove a player from the roster. Returns `true` if the roster changed.
    pub fn player_left(&mut self, name: &str) -> bool {
        self.players.remove(name)
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub const fn max_players(&self) -> u32 {
        self.max_players
    }

    /// Milliseconds since the server became ready, 0 when not running.
    pub fn uptime_ms(&self) -> u64 {
        self.started_at.map_or(0, |(_, since)| {
            u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
        })
    }

    /// Point-in-time copy for readers.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            running: self.running,
            players: self.players.len(),
            roster: self.players.iter().cloned().collect(),
            max_players: self.max_players,
            uptime: self.uptime_ms(),
            started_at: self.started_at.map(|(at, _)| at),
        }
    }
}

/// Immutable status copy returned to callers and broadcast as `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Whether the server is up and ready.
    pub running: bool,
    /// Number of connected players.
    pub players: usize,
    /// Connected player names, sorted.
    pub roster: Vec<String>,
    /// Configured player cap.
    pub max_players: u32,
    /// Milliseconds since the server became ready.
    pub uptime: u64,
    /// Wall-clock time the server became ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}
