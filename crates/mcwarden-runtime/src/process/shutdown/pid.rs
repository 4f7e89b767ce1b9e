//! Kill an orphaned server by PID (no `Child` handle, so no reaping).

use std::io;

#[cfg(unix)]
use std::time::Duration;
#[cfg(unix)]
use tokio::time::sleep;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

#[cfg(unix)]
const POLL_INTERVAL: Duration = Duration::from_millis(100);
#[cfg(unix)]
const POLL_ATTEMPTS: u32 = 50;

/// Kill a process left behind by a crashed supervisor.
///
/// Sends SIGTERM and polls for up to five seconds, then SIGKILL and polls
/// again. The caller must have verified that the PID is ours.
pub async fn kill_pid(pid: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        kill_pid_unix(pid).await
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "orphan cleanup is only implemented on unix",
        ))
    }
}

#[cfg(unix)]
async fn kill_pid_unix(pid: u32) -> io::Result<()> {
    let pid = Pid::from_raw(i32::try_from(pid).map_err(io::Error::other)?);

    for sig in [Signal::SIGTERM, Signal::SIGKILL] {
        match signal::kill(pid, sig) {
            Ok(()) => {}
            Err(Errno::ESRCH) => return Ok(()),
            Err(e) => return Err(io::Error::other(e)),
        }
        if wait_gone(pid).await {
            return Ok(());
        }
        tracing::debug!(%pid, signal = %sig, "Orphan still alive after signal");
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("process {pid} did not exit after SIGKILL"),
    ))
}

#[cfg(unix)]
async fn wait_gone(pid: Pid) -> bool {
    for _ in 0..POLL_ATTEMPTS {
        sleep(POLL_INTERVAL).await;
        if matches!(signal::kill(pid, None), Err(Errno::ESRCH)) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[cfg(unix)]
    async fn missing_pid_is_ok() {
        assert!(kill_pid(3_999_999).await.is_ok());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn terminates_running_process() {
        let mut child = tokio::process::Command::new("sleep")
            .arg("60")
            .spawn()
            .expect("failed to spawn sleep");
        let pid = child.id().expect("pid");

        // The zombie keeps answering signal 0 until it is reaped, so reap
        // concurrently the way init would for a real orphan.
        let reaper = tokio::spawn(async move { child.wait().await });
        kill_pid(pid).await.expect("kill_pid");
        reaper.await.expect("join").expect("wait");

        assert!(!crate::pidfile::pid_exists(pid));
    }
}
