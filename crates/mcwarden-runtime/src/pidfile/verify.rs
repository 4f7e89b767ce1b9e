//! Process verification so a reused PID is never killed.

use std::path::Path;

#[cfg(target_os = "linux")]
use std::fs;

/// Check whether `pid` is a game server running in `server_dir`.
///
/// - **Linux**: the `/proc/<pid>/cwd` link must resolve to `server_dir`
/// - **Other**: always `false`, so only the pidfile gets cleaned up
pub fn is_our_server(pid: u32, server_dir: &Path) -> bool {
    if pid == std::process::id() {
        return false;
    }

    #[cfg(target_os = "linux")]
    {
        is_our_server_linux(pid, server_dir)
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = server_dir;
        false
    }
}

#[cfg(target_os = "linux")]
fn is_our_server_linux(pid: u32, server_dir: &Path) -> bool {
    let Ok(cwd) = fs::read_link(format!("/proc/{pid}/cwd")) else {
        return false;
    };

    match (cwd.canonicalize(), server_dir.canonicalize()) {
        (Ok(actual), Ok(expected)) => actual == expected,
        _ => false,
    }
}

/// Check if a PID exists (without verifying it's ours).
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    use nix::sys::signal;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    match signal::kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::ESRCH) => false,
        // Exists, but belongs to someone else.
        Err(_) => true,
    }
}

#[cfg(not(unix))]
pub fn pid_exists(_pid: u32) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn pid_exists_for_self() {
        assert!(pid_exists(std::process::id()));
    }

    #[test]
    #[cfg(unix)]
    fn pid_exists_false_for_impossible_pid() {
        assert!(!pid_exists(3_999_999));
    }

    #[test]
    fn own_process_is_never_ours() {
        let cwd = std::env::current_dir().expect("cwd");
        assert!(!is_our_server(std::process::id(), &cwd));
    }

    #[tokio::test]
    #[cfg(target_os = "linux")]
    async fn child_in_server_dir_is_ours() {
        let dir = tempfile::tempdir().expect("tempdir");
        let other = tempfile::tempdir().expect("tempdir");
        let mut child = tokio::process::Command::new("sleep")
            .arg("30")
            .current_dir(dir.path())
            .kill_on_drop(true)
            .spawn()
            .expect("spawn sleep");
        let pid = child.id().expect("pid");

        assert!(is_our_server(pid, dir.path()));
        assert!(!is_our_server(pid, other.path()));

        child.kill().await.expect("kill");
    }
}
