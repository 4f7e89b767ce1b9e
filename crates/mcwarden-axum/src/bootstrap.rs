//! Axum server bootstrap - the composition root.
//!
//! This is the only place where concrete infrastructure (HTTP fetcher,
//! process launcher, JSON list stores) is wired into a `ServerManager`.

use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use mcwarden_core::{LaunchSpec, ServerProperties, SupervisorConfig};
use mcwarden_runtime::pidfile::pidfile_path;
use mcwarden_runtime::{
    CommandLauncher, HttpFetcher, ServerLayout, ServerManager, ServerSupervisor, ban_store,
    operator_store,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::auth::Passcode;
use crate::routes::{create_router, create_spa_router};

/// How long open HTTP/WebSocket connections may linger after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Configuration for the control plane and the server it supervises.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface the HTTP server binds to.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Directory holding the game server's jar, world and list files.
    pub server_dir: PathBuf,
    /// Java executable.
    pub java: PathBuf,
    /// Shared admin passcode. Must not be empty.
    pub passcode: String,
    /// Optional directory with the admin UI.
    pub public_dir: Option<PathBuf>,
    /// Host name players connect to, reported by `/api/status`.
    pub public_address: String,
    /// Start the game server as soon as the control plane is up.
    pub autostart: bool,
    pub cors: CorsConfig,
    pub supervisor: SupervisorConfig,
    pub properties: ServerProperties,
}

impl AppConfig {
    /// Create a config with production defaults and no passcode.
    pub fn with_defaults() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            server_dir: PathBuf::from("minecraft-server"),
            java: PathBuf::from("java"),
            passcode: String::new(),
            public_dir: None,
            public_address: "localhost".to_string(),
            autostart: true,
            cors: CorsConfig::default(),
            supervisor: SupervisorConfig::with_defaults(),
            properties: ServerProperties::default(),
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_server_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.server_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = java.into();
        self
    }

    #[must_use]
    pub fn with_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.passcode = passcode.into();
        self
    }

    /// Serve the admin UI from `dir`, falling back to its `index.html`.
    #[must_use]
    pub fn with_public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_public_address(mut self, address: impl Into<String>) -> Self {
        self.public_address = address.into();
        self
    }

    #[must_use]
    pub const fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    #[must_use]
    pub fn with_supervisor(mut self, supervisor: SupervisorConfig) -> Self {
        self.supervisor = supervisor;
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: ServerProperties) -> Self {
        self.properties = properties;
        self
    }
}

/// Everything the handlers need.
pub struct AxumContext {
    pub manager: Arc<ServerManager>,
    pub passcode: Passcode,
    /// Reported to players as the connect address.
    pub public_address: String,
    /// Java edition port reported next to the address.
    pub game_port: u16,
}

/// Wire the production `ServerManager` for `config`.
pub fn bootstrap(config: &AppConfig) -> Result<AxumContext> {
    if config.passcode.is_empty() {
        bail!("an admin passcode is required (set MCWARDEN_PASSCODE or pass --passcode)");
    }

    // The orphan sweep compares against /proc/<pid>/cwd, which is absolute.
    let server_dir = std::path::absolute(&config.server_dir).with_context(|| {
        format!(
            "failed to resolve server directory {}",
            config.server_dir.display()
        )
    })?;

    info!(
        server_dir = %server_dir.display(),
        java = %config.java.display(),
        game_port = config.properties.server_port,
        "Bootstrapping mcwarden"
    );

    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
    let layout = ServerLayout::new(&server_dir, Arc::new(fetcher))
        .with_properties(config.properties.clone());

    let launcher = CommandLauncher::new(LaunchSpec::paper(&config.java, &server_dir));
    let supervisor_config = config
        .supervisor
        .clone()
        .with_max_players(config.properties.max_players);
    let supervisor = ServerSupervisor::with_pidfile(
        supervisor_config,
        Arc::new(launcher),
        pidfile_path(&server_dir),
    );

    let manager = ServerManager::new(
        supervisor,
        Arc::new(layout),
        Arc::new(operator_store(&server_dir)),
        Arc::new(ban_store(&server_dir)),
    )
    .with_orphan_sweep(&server_dir);

    Ok(AxumContext {
        manager: Arc::new(manager),
        passcode: Passcode::new(config.passcode.clone()),
        public_address: config.public_address.clone(),
        game_port: config.properties.server_port,
    })
}

/// Run the control plane until SIGINT/SIGTERM, then stop the game server.
pub async fn start_server(config: AppConfig) -> Result<()> {
    let ctx = bootstrap(&config)?;
    let manager = Arc::clone(&ctx.manager);

    let app = if let Some(ref public_dir) = config.public_dir {
        info!("Serving admin UI from: {}", public_dir.display());
        create_spa_router(ctx, public_dir, &config.cors)
    } else {
        create_router(ctx, &config.cors)
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("mcwarden control plane listening on http://{}", addr);

    let (stop_http, http_stopped) = oneshot::channel::<()>();
    let mut serve = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = http_stopped.await;
            })
            .into_future(),
    );

    if config.autostart {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            match manager.start().await {
                Ok(()) => info!("Game server started automatically"),
                Err(e) => error!(error = %e, "Automatic start failed"),
            }
        });
    }

    let serve_result = tokio::select! {
        signal = wait_for_shutdown_signal() => {
            if let Err(e) = signal {
                error!(error = %e, "Failed to listen for shutdown signals");
            }
            None
        }
        result = &mut serve => Some(result),
    };

    info!("Shutting down");
    if let Err(e) = manager.shutdown().await {
        error!(error = %e, "Failed to stop game server cleanly");
    }

    let result = match serve_result {
        Some(result) => result,
        None => {
            let _ = stop_http.send(());
            if let Ok(result) = tokio::time::timeout(DRAIN_TIMEOUT, &mut serve).await {
                result
            } else {
                warn!("Connections still open after drain timeout, exiting anyway");
                serve.abort();
                return Ok(());
            }
        }
    };
    result.context("HTTP server task panicked")??;
    Ok(())
}

async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = AppConfig::with_defaults();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.autostart);
        assert!(config.public_dir.is_none());
        assert_eq!(config.properties.server_port, 25565);
    }

    #[test]
    fn bootstrap_requires_passcode() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::with_defaults().with_server_dir(dir.path());
        let err = bootstrap(&config).err().unwrap();
        assert!(err.to_string().contains("passcode"));
    }

    #[tokio::test]
    async fn bootstrap_wires_manager_idle() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::with_defaults()
            .with_server_dir(dir.path())
            .with_passcode("s3cret")
            .with_public_address("mc.example.net");

        let ctx = bootstrap(&config).unwrap();
        assert!(ctx.passcode.verify("s3cret"));
        assert_eq!(ctx.public_address, "mc.example.net");
        assert_eq!(ctx.game_port, 25565);
        assert!(!ctx.manager.snapshot().running);
    }
}
