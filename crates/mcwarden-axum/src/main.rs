//! `mcwarden` binary: parse flags, set up logging, run the control plane.

use std::path::PathBuf;

use clap::Parser;
use mcwarden_axum::{AppConfig, start_server};
use mcwarden_core::{DEFAULT_GAME_PORT, DEFAULT_MAX_PLAYERS, ServerProperties, java_from_home};

/// Minecraft server supervisor with a web admin panel.
#[derive(Debug, Parser)]
#[command(name = "mcwarden", version, about)]
struct Cli {
    /// HTTP port for the admin panel and API.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Interface to bind.
    #[arg(long, env = "MCWARDEN_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Directory holding the game server files.
    #[arg(long, env = "MCWARDEN_SERVER_DIR", default_value = "minecraft-server")]
    server_dir: PathBuf,

    /// Java executable. Defaults to `$JAVA_HOME/bin/java`, then `java`.
    #[arg(long, env = "MCWARDEN_JAVA")]
    java: Option<PathBuf>,

    /// Admin passcode required by every mutating endpoint.
    #[arg(long, env = "MCWARDEN_PASSCODE", hide_env_values = true)]
    passcode: String,

    /// Directory with the admin UI. Ignored when it does not exist.
    #[arg(long, env = "MCWARDEN_PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,

    /// Address players use to connect, shown by `/api/status`.
    #[arg(long, env = "MCWARDEN_PUBLIC_ADDRESS", default_value = "localhost")]
    public_address: String,

    /// Java edition port written to server.properties.
    #[arg(long, env = "MCWARDEN_GAME_PORT", default_value_t = DEFAULT_GAME_PORT)]
    game_port: u16,

    #[arg(long, env = "MCWARDEN_MAX_PLAYERS", default_value_t = DEFAULT_MAX_PLAYERS)]
    max_players: u32,

    /// Restrict CORS to these origins (repeatable). All origins by default.
    #[arg(long = "allow-origin")]
    allow_origins: Vec<String>,

    /// Do not start the game server on launch.
    #[arg(long)]
    no_autostart: bool,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let java = self.java.unwrap_or_else(|| {
            let home = std::env::var_os("JAVA_HOME").map(PathBuf::from);
            java_from_home(home.as_deref())
        });

        let properties = ServerProperties {
            server_port: self.game_port,
            max_players: self.max_players,
            ..ServerProperties::default()
        };

        let mut config = AppConfig::with_defaults()
            .with_host(self.host)
            .with_port(self.port)
            .with_server_dir(self.server_dir)
            .with_java(java)
            .with_passcode(self.passcode)
            .with_public_address(self.public_address)
            .with_autostart(!self.no_autostart)
            .with_properties(properties);

        if self.public_dir.is_dir() {
            config = config.with_public_dir(self.public_dir);
        } else {
            tracing::info!(
                public_dir = %self.public_dir.display(),
                "Admin UI directory not found, serving the API only"
            );
        }
        if !self.allow_origins.is_empty() {
            config = config.with_allowed_origins(self.allow_origins);
        }
        config
    }
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Cli::parse().into_config();
    start_server(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::parse_from([
            "mcwarden",
            "--passcode",
            "s3cret",
            "--port",
            "8080",
            "--java",
            "/opt/jdk/bin/java",
            "--public-dir",
            "/nonexistent/mcwarden-ui",
            "--game-port",
            "25570",
            "--no-autostart",
        ]);
        let config = cli.into_config();

        assert_eq!(config.port, 8080);
        assert_eq!(config.passcode, "s3cret");
        assert_eq!(config.java, PathBuf::from("/opt/jdk/bin/java"));
        assert_eq!(config.properties.server_port, 25570);
        assert!(config.public_dir.is_none());
        assert!(!config.autostart);
    }
}
