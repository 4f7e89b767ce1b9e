//! Shared helpers: `sh` scripts standing in for the game server.

#![allow(dead_code)]

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mcwarden_core::{LaunchSpec, ServerEvent, SupervisorConfig};
use mcwarden_runtime::{CommandLauncher, ProcessLauncher, ServerSupervisor, Subscription};
use tokio::process::Child;

/// Prints a ready line, echoes console input, exits on `stop` (0) or `crash` (3).
pub const ECHO_SERVER: &str = r#"echo "[Server thread/INFO]: Starting minecraft server"
echo "[Server thread/INFO]: Done (0.42s)! For help, type \"help\""
while IFS= read -r line; do
  case "$line" in
    stop) echo "[Server thread/INFO]: Stopping the server"; exit 0 ;;
    crash) exit 3 ;;
    *) echo "[Server thread/INFO]: $line" ;;
  esac
done"#;

/// Reaches ready, then ignores the console and SIGTERM.
pub const STUBBORN_SERVER: &str = r#"trap '' TERM
echo "Done (0.10s)! For help, type \"help\""
while true; do sleep 1; done"#;

pub fn fast_config() -> SupervisorConfig {
    SupervisorConfig::with_defaults()
        .with_start_timeout(Duration::from_secs(5))
        .with_stop_timeout(Duration::from_secs(5))
        .with_kill_grace(Duration::from_millis(500))
}

pub fn sh_launcher(script: &str, dir: &Path) -> CommandLauncher {
    CommandLauncher::new(LaunchSpec::new("sh", ["-c", script], dir))
}

pub fn supervisor(script: &str, dir: &Path, config: SupervisorConfig) -> ServerSupervisor {
    ServerSupervisor::new(config, Arc::new(sh_launcher(script, dir)))
}

/// Counts launches of the wrapped launcher.
pub struct CountingLauncher {
    inner: CommandLauncher,
    pub launches: AtomicUsize,
}

impl CountingLauncher {
    pub const fn new(inner: CommandLauncher) -> Self {
        Self {
            inner,
            launches: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl ProcessLauncher for CountingLauncher {
    fn launch(&self) -> io::Result<Child> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        self.inner.launch()
    }
}

/// Wait (at most five seconds) for the first event matching `pred`.
pub async fn wait_for(
    events: &mut Subscription,
    pred: impl Fn(&ServerEvent) -> bool,
) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = events.recv().await {
            if pred(&event) {
                return event;
            }
        }
        panic!("event bus closed");
    })
    .await
    .expect("timed out waiting for event")
}

pub fn is_status(event: &ServerEvent, running: bool) -> bool {
    matches!(event, ServerEvent::Status(snapshot) if snapshot.running == running)
}
