//! Event types flowing out of the supervised game server.
//!
//! Two layers live here:
//!
//! - [`LifecycleEvent`] - the internal, semantic view produced by the log
//!   classifier and the supervisor. It drives the state machine.
//! - [`ServerEvent`] - the wire envelope published on the event bus and
//!   relayed verbatim to control-plane viewers.
//!
//! # Wire Format
//!
//! ```json
//! { "type": "playerJoin", "data": { "player": "Steve" } }
//! ```

mod server;

pub use server::{LogMessage, PlayerRef, ServerEvent};

/// Semantic event inferred from the game server's process.
///
/// Produced by [`LogClassifier`](crate::classifier::LogClassifier) for output
/// lines and by the supervisor for process exit. Consumed by the single
/// state-mutation path of the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The server finished loading and accepts players.
    ServerReady,
    /// A player connected.
    PlayerJoined(String),
    /// A player disconnected.
    PlayerLeft(String),
    /// The process exited. `None` when it was terminated by a signal.
    ProcessExited(Option<i32>),
    /// An output line that carries no lifecycle meaning.
    LogLine(String),
}

impl LifecycleEvent {
    /// Whether this event carries lifecycle meaning beyond display.
    pub const fn is_semantic(&self) -> bool {
        !matches!(self, Self::LogLine(_))
    }
}
