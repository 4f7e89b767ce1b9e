//! Spawning the game server process.

use std::io;
use std::process::Stdio;

use mcwarden_core::LaunchSpec;
use tokio::process::{Child, Command};
use tracing::debug;

/// Creates the OS process for one supervised run.
///
/// The returned child must have stdin, stdout and stderr piped.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self) -> io::Result<Child>;
}

/// Launches a [`LaunchSpec`] with piped stdio and kill-on-drop.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    spec: LaunchSpec,
}

impl CommandLauncher {
    pub const fn new(spec: LaunchSpec) -> Self {
        Self { spec }
    }

    pub const fn spec(&self) -> &LaunchSpec {
        &self.spec
    }
}

impl ProcessLauncher for CommandLauncher {
    fn launch(&self) -> io::Result<Child> {
        debug!(
            program = %self.spec.program.display(),
            args = ?self.spec.args,
            cwd = %self.spec.working_dir.display(),
            "Launching game server"
        );

        Command::new(&self.spec.program)
            .args(&self.spec.args)
            .current_dir(&self.spec.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_fails_to_launch() {
        let launcher = CommandLauncher::new(LaunchSpec::new(
            "/nonexistent/mcwarden-java",
            ["-version"],
            std::env::temp_dir(),
        ));
        let err = launcher.launch().expect_err("spawn should fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn launched_child_has_piped_stdio() {
        let launcher =
            CommandLauncher::new(LaunchSpec::new("cat", Vec::<String>::new(), std::env::temp_dir()));
        let mut child = launcher.launch().expect("spawn cat");
        assert!(child.stdin.is_some());
        assert!(child.stdout.is_some());
        assert!(child.stderr.is_some());
        drop(child.stdin.take());
        let status = child.wait().await.expect("wait");
        assert!(status.success());
    }
}
