//! Forced process termination.
//!
//! - `terminate_child`: for the supervised process (owned `Child`, reaped)
//! - `kill_pid`: for orphans found through a stale pidfile (PID only)

mod child;
mod pid;

pub use child::terminate_child;
pub use pid::kill_pid;
