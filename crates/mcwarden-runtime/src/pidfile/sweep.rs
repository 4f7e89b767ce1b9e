//! Startup cleanup of a game server left behind by a crashed supervisor.

use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use super::io::{delete_pidfile, pidfile_path, read_pidfile};
use super::verify::is_our_server;
use crate::process::shutdown::kill_pid;

/// What the sweep found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// No pidfile, nothing to do.
    Clean,
    /// The recorded PID was gone or not ours; the file was removed.
    StaleRemoved,
    /// A verified orphan was terminated.
    OrphanKilled(u32),
}

/// Kill an orphaned server recorded in `server_dir`'s pidfile.
///
/// The PID is only signalled when it verifiably runs inside `server_dir`;
/// otherwise the pidfile is just removed. Must run before the first start,
/// since a live orphan would still hold the game port and world lock.
pub async fn sweep_orphan(server_dir: &Path) -> io::Result<SweepOutcome> {
    let path = pidfile_path(server_dir);

    let pid = match read_pidfile(&path) {
        Ok(pid) => pid,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No pidfile found");
            return Ok(SweepOutcome::Clean);
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable pidfile, removing it");
            delete_pidfile(&path)?;
            return Ok(SweepOutcome::StaleRemoved);
        }
    };

    if !is_our_server(pid, server_dir) {
        debug!(pid, "Pidfile points at a foreign or dead process, removing it");
        delete_pidfile(&path)?;
        return Ok(SweepOutcome::StaleRemoved);
    }

    info!(pid, "Found orphaned game server from a previous run, terminating it");
    let outcome = match kill_pid(pid).await {
        Ok(()) => SweepOutcome::OrphanKilled(pid),
        Err(e) => {
            warn!(pid, error = %e, "Failed to kill orphaned game server, removing stale pidfile");
            SweepOutcome::StaleRemoved
        }
    };
    delete_pidfile(&path)?;
    Ok(outcome)
}
