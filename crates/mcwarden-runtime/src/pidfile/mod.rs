//! Pidfile tracking for the game server process.
//!
//! # Safety guarantees
//! - Atomic writes via temp file + rename
//! - Process verification before killing (prevents PID reuse issues)
//! - Conservative cleanup (if verification fails, only delete the pidfile)

mod io;
mod sweep;
mod verify;

pub use io::{PIDFILE_NAME, delete_pidfile, pidfile_path, read_pidfile, write_pidfile};
pub use sweep::{SweepOutcome, sweep_orphan};
pub use verify::{is_our_server, pid_exists};
