//! Game server process management.
//!
//! - [`ServerSupervisor`]: spawns the server, follows its console and
//!   drives the lifecycle state machine
//! - [`EventBus`]: broadcasts [`ServerEvent`](mcwarden_core::ServerEvent)s
//!   to viewers
//! - [`ProcessLauncher`]: how the OS process gets created
//! - `shutdown`: SIGTERM → SIGKILL helpers for owned children and orphans

mod bus;
mod launcher;
pub mod shutdown;
mod stream;
mod supervisor;
mod types;

pub use bus::{EventBus, Subscription};
pub use launcher::{CommandLauncher, ProcessLauncher};
pub use shutdown::{kill_pid, terminate_child};
pub use supervisor::ServerSupervisor;
pub use types::{Phase, ProcessState, WorkerMessage};
