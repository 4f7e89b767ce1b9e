//! Settings domain types and defaults.
//!
//! Pure configuration types with no infrastructure dependencies. Adapters
//! build these from CLI flags / environment and hand them to the runtime.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Substrings that mark startup completion in Paper/Spigot output.
pub const DEFAULT_READY_MARKERS: &[&str] = &["Done (", "For help, type \"help\""];

/// Console command that asks the server to save and exit.
pub const DEFAULT_STOP_COMMAND: &str = "stop";

/// How long `start` waits for a ready marker.
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(60);

/// How long `stop` waits for a graceful exit before forcing termination.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// Grace period between SIGTERM and SIGKILL when forcing termination.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(5);

/// Player cap written to `server.properties` and reported in snapshots.
pub const DEFAULT_MAX_PLAYERS: u32 = 999_999;

/// Java edition listen port.
pub const DEFAULT_GAME_PORT: u16 = 25565;

/// Bedrock (Geyser) listen port.
pub const DEFAULT_BEDROCK_PORT: u16 = 19132;

/// Event bus capacity per subscriber before the oldest events are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Supervisor tuning knobs.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Wait for the ready marker at most this long.
    pub start_timeout: Duration,
    /// Wait for a graceful exit at most this long.
    pub stop_timeout: Duration,
    /// SIGTERM to SIGKILL grace when forcing termination.
    pub kill_grace: Duration,
    /// Command written to stdin to request shutdown.
    pub stop_command: String,
    /// Substrings that mark startup completion.
    pub ready_markers: Vec<String>,
    /// Player cap reported in snapshots.
    pub max_players: u32,
    /// Per-subscriber event buffer.
    pub event_capacity: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl SupervisorConfig {
    /// Create a config with production defaults.
    pub fn with_defaults() -> Self {
        Self {
            start_timeout: DEFAULT_START_TIMEOUT,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            kill_grace: DEFAULT_KILL_GRACE,
            stop_command: DEFAULT_STOP_COMMAND.to_string(),
            ready_markers: DEFAULT_READY_MARKERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_players: DEFAULT_MAX_PLAYERS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    #[must_use]
    pub const fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    #[must_use]
    pub fn with_stop_command(mut self, command: impl Into<String>) -> Self {
        self.stop_command = command.into();
        self
    }

    #[must_use]
    pub fn with_ready_markers(mut self, markers: Vec<String>) -> Self {
        self.ready_markers = markers;
        self
    }

    #[must_use]
    pub const fn with_max_players(mut self, max_players: u32) -> Self {
        self.max_players = max_players;
        self
    }
}

/// Values templated into `server.properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerProperties {
    pub server_port: u16,
    pub bedrock_port: u16,
    pub max_players: u32,
    pub motd: String,
    pub gamemode: String,
    pub difficulty: String,
    pub online_mode: bool,
    pub view_distance: u8,
    pub level_name: String,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_GAME_PORT,
            bedrock_port: DEFAULT_BEDROCK_PORT,
            max_players: DEFAULT_MAX_PLAYERS,
            motd: "A mcwarden server - Java & Bedrock".to_string(),
            gamemode: "survival".to_string(),
            difficulty: "normal".to_string(),
            online_mode: false,
            view_distance: 10,
            level_name: "world".to_string(),
        }
    }
}

impl ServerProperties {
    /// Render the `server.properties` file body.
    pub fn render(&self) -> String {
        let lines = [
            "#Minecraft server properties".to_string(),
            format!("server-port={}", self.server_port),
            "server-ip=0.0.0.0".to_string(),
            format!("gamemode={}", self.gamemode),
            format!("difficulty={}", self.difficulty),
            format!("max-players={}", self.max_players),
            format!("online-mode={}", self.online_mode),
            "white-list=false".to_string(),
            "spawn-protection=0".to_string(),
            format!("motd={}", escape_property(&self.motd)),
            "enable-rcon=false".to_string(),
            format!("view-distance={}", self.view_distance),
            format!("simulation-distance={}", self.view_distance),
            "pvp=true".to_string(),
            "allow-flight=false".to_string(),
            format!("level-name={}", escape_property(&self.level_name)),
            "level-type=minecraft\\:normal".to_string(),
        ];
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Java properties escaping for the characters a value can trip over.
fn escape_property(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('=', "\\=")
        .replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_defaults_match_constants() {
        let config = SupervisorConfig::with_defaults();
        assert_eq!(config.start_timeout, Duration::from_secs(60));
        assert_eq!(config.stop_timeout, Duration::from_secs(30));
        assert_eq!(config.stop_command, "stop");
        assert_eq!(config.ready_markers.len(), DEFAULT_READY_MARKERS.len());
    }

    #[test]
    fn builders_override_fields() {
        let config = SupervisorConfig::with_defaults()
            .with_start_timeout(Duration::from_millis(5))
            .with_stop_command("end")
            .with_max_players(8);
        assert_eq!(config.start_timeout, Duration::from_millis(5));
        assert_eq!(config.stop_command, "end");
        assert_eq!(config.max_players, 8);
    }

    #[test]
    fn properties_render_ports_and_cap() {
        let rendered = ServerProperties::default().render();
        assert!(rendered.contains("server-port=25565\n"));
        assert!(rendered.contains("max-players=999999\n"));
        assert!(rendered.contains("online-mode=false\n"));
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn motd_is_escaped() {
        let props = ServerProperties {
            motd: "a=b: c\nd".to_string(),
            ..ServerProperties::default()
        };
        assert!(props.render().contains("motd=a\\=b\\: c d\n"));
    }
}
