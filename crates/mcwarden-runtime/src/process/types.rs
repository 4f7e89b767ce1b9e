//! Types shared between the supervisor and its per-process tasks.

use std::fmt;

/// Lifecycle phase of the supervised server.
///
/// `Idle → Starting → Running → Stopping → Idle`, with `Starting → Idle`
/// when the process dies before it becomes ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Starting,
    Running,
    Stopping,
}

impl Phase {
    /// Whether a process exists in this phase.
    pub const fn has_process(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// Liveness of one spawned process, published on a watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Alive,
    /// Exit observed by the worker. `None` when killed by a signal.
    Exited(Option<i32>),
}

impl ProcessState {
    pub const fn is_exited(self) -> bool {
        matches!(self, Self::Exited(_))
    }

    pub const fn exit_code(self) -> Option<i32> {
        match self {
            Self::Alive => None,
            Self::Exited(code) => code,
        }
    }
}

/// Message on the per-process worker channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// One console line from stdout or stderr.
    Output(String),
    /// The process was reaped. Always the last message of a generation.
    Exited(Option<i32>),
}

/// How a pending start was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadyOutcome {
    Ready,
    Exited(Option<i32>),
}
