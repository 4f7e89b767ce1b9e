//! Facade over the supervisor, provisioning and the operator/ban lists.
//!
//! This is the surface the control plane talks to. Operator and ban
//! mutations go to the live server first; the list files are updated
//! afterwards on a best-effort basis, because the game may rewrite them at
//! any time and the in-game command is what takes effect.

use std::path::PathBuf;
use std::sync::Arc;

use mcwarden_core::{
    BanEntry, DEFAULT_BAN_REASON, ListStore, OperatorEntry, ServerProvisioner, StatusSnapshot,
    StoreError, SupervisorError, validate_player_name, validate_single_line,
};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::pidfile::{SweepOutcome, sweep_orphan};
use crate::process::{Phase, ServerSupervisor, Subscription};

/// Entry point for everything the control plane can do to the server.
pub struct ServerManager {
    supervisor: ServerSupervisor,
    provisioner: Arc<dyn ServerProvisioner>,
    operators: Arc<dyn ListStore<OperatorEntry>>,
    bans: Arc<dyn ListStore<BanEntry>>,
    sweep_dir: Option<PathBuf>,
    initialized: OnceCell<()>,
}

impl ServerManager {
    pub fn new(
        supervisor: ServerSupervisor,
        provisioner: Arc<dyn ServerProvisioner>,
        operators: Arc<dyn ListStore<OperatorEntry>>,
        bans: Arc<dyn ListStore<BanEntry>>,
    ) -> Self {
        Self {
            supervisor,
            provisioner,
            operators,
            bans,
            sweep_dir: None,
            initialized: OnceCell::new(),
        }
    }

    /// Kill a verified orphan recorded in `server_dir` during initialization.
    #[must_use]
    pub fn with_orphan_sweep(mut self, server_dir: impl Into<PathBuf>) -> Self {
        self.sweep_dir = Some(server_dir.into());
        self
    }

    pub const fn supervisor(&self) -> &ServerSupervisor {
        &self.supervisor
    }

    /// Prepare the server directory. Runs once; later calls are no-ops.
    ///
    /// A failed attempt is retried by the next call.
    pub async fn initialize(&self) -> Result<(), SupervisorError> {
        self.initialized
            .get_or_try_init(|| async {
                if let Some(dir) = &self.sweep_dir {
                    match sweep_orphan(dir).await {
                        Ok(SweepOutcome::OrphanKilled(pid)) => {
                            info!(pid, "Terminated orphaned game server");
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "Orphan sweep failed"),
                    }
                }
                self.provisioner.provision().await?;
                Ok::<(), SupervisorError>(())
            })
            .await?;
        Ok(())
    }

    /// Initialize if needed, then start the server.
    pub async fn start(&self) -> Result<(), SupervisorError> {
        self.initialize().await?;
        self.supervisor.start().await
    }

    pub async fn stop(&self) -> Result<Option<i32>, SupervisorError> {
        self.supervisor.stop().await
    }

    pub async fn restart(&self) -> Result<(), SupervisorError> {
        self.initialize().await?;
        self.supervisor.restart().await
    }

    /// Forward a raw console command.
    pub async fn send_command(&self, text: &str) -> Result<(), SupervisorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SupervisorError::InvalidInput(
                "command must not be empty".to_string(),
            ));
        }
        validate_single_line("command", text).map_err(SupervisorError::InvalidInput)?;
        self.supervisor.send_command(text).await
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.supervisor.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.supervisor.phase()
    }

    pub fn subscribe(&self) -> Subscription {
        self.supervisor.subscribe()
    }

    pub async fn add_operator(&self, name: &str) -> Result<(), SupervisorError> {
        validate_player_name(name).map_err(SupervisorError::InvalidInput)?;
        self.supervisor.send_command(&format!("op {name}")).await?;

        persist(self.operators.as_ref(), "operators", |ops| {
            if !ops.iter().any(|op| op.matches(name)) {
                ops.push(OperatorEntry::new(name));
            }
        })
        .await;
        info!(player = %name, "Operator added");
        Ok(())
    }

    pub async fn remove_operator(&self, name: &str) -> Result<(), SupervisorError> {
        validate_player_name(name).map_err(SupervisorError::InvalidInput)?;
        self.supervisor.send_command(&format!("deop {name}")).await?;

        persist(self.operators.as_ref(), "operators", |ops| {
            ops.retain(|op| !op.matches(name));
        })
        .await;
        info!(player = %name, "Operator removed");
        Ok(())
    }

    /// Ban a player. `None` or a blank reason uses the default reason.
    pub async fn ban_player(&self, name: &str, reason: Option<&str>) -> Result<(), SupervisorError> {
        validate_player_name(name).map_err(SupervisorError::InvalidInput)?;
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_BAN_REASON);
        validate_single_line("reason", reason).map_err(SupervisorError::InvalidInput)?;

        self.supervisor
            .send_command(&format!("ban {name} {reason}"))
            .await?;

        persist(self.bans.as_ref(), "bans", |bans| {
            if let Some(existing) = bans.iter_mut().find(|ban| ban.matches(name)) {
                existing.reason = reason.to_string();
            } else {
                bans.push(BanEntry::new(name, reason));
            }
        })
        .await;
        info!(player = %name, %reason, "Player banned");
        Ok(())
    }

    pub async fn unban_player(&self, name: &str) -> Result<(), SupervisorError> {
        validate_player_name(name).map_err(SupervisorError::InvalidInput)?;
        self.supervisor
            .send_command(&format!("pardon {name}"))
            .await?;

        persist(self.bans.as_ref(), "bans", |bans| {
            bans.retain(|ban| !ban.matches(name));
        })
        .await;
        info!(player = %name, "Player unbanned");
        Ok(())
    }

    pub async fn list_operators(&self) -> Result<Vec<OperatorEntry>, SupervisorError> {
        Ok(self.operators.read().await?)
    }

    pub async fn list_bans(&self) -> Result<Vec<BanEntry>, SupervisorError> {
        Ok(self.bans.read().await?)
    }

    /// Stop the server if one exists. Used on process shutdown.
    pub async fn shutdown(&self) -> Result<(), SupervisorError> {
        match self.supervisor.stop().await {
            Ok(exit_code) => {
                info!(exit_code = ?exit_code, "Game server shut down");
                Ok(())
            }
            Err(SupervisorError::NotRunning) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Read-modify-write a list, logging instead of failing.
async fn persist<T, F>(store: &dyn ListStore<T>, list: &'static str, edit: F)
where
    T: Send + Sync,
    F: FnOnce(&mut Vec<T>) + Send,
{
    let result: Result<(), StoreError> = async {
        let mut entries = store.read().await?;
        edit(&mut entries);
        store.write(&entries).await
    }
    .await;

    if let Err(e) = result {
        warn!(list, error = %e, "Failed to persist list change, in-game command was still applied");
    }
}
