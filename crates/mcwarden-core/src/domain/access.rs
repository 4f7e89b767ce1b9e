//! Operator and ban list entries.
//!
//! Field names follow the files the game server itself reads and writes
//! (`ops.json`, `banned-players.json`), so both sides can share them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Permission level granted by a plain `op` command.
pub const DEFAULT_OP_LEVEL: u8 = 4;

/// Reason used when a ban request carries none.
pub const DEFAULT_BAN_REASON: &str = "No reason provided";

const MAX_NAME_LEN: usize = 32;

/// One entry of `ops.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorEntry {
    /// Name or UUID the server keys the entry by.
    #[serde(rename = "uuid")]
    pub identity: String,
    /// Player name shown to admins.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Permission level (1-4).
    #[serde(default = "default_level")]
    pub level: u8,
    /// Whether the operator may join a full server.
    #[serde(rename = "bypassesPlayerLimit", default)]
    pub bypasses_limit: bool,
}

const fn default_level() -> u8 {
    DEFAULT_OP_LEVEL
}

impl OperatorEntry {
    /// Entry for a player opped by name.
    pub fn new(player: impl Into<String>) -> Self {
        let player = player.into();
        Self {
            identity: player.clone(),
            display_name: player,
            level: DEFAULT_OP_LEVEL,
            bypasses_limit: false,
        }
    }

    /// Whether this entry refers to `player` by name or identity.
    pub fn matches(&self, player: &str) -> bool {
        self.display_name == player || self.identity == player
    }
}

/// One entry of `banned-players.json`.
///
/// Fields the game adds on its own (`uuid`, `created`, `source`,
/// `expires`) are kept in `extra` so a rewrite does not lose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanEntry {
    /// Banned player name or identity.
    #[serde(rename = "name")]
    pub identity: String,
    /// Reason shown to the player.
    #[serde(default = "default_reason")]
    pub reason: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_reason() -> String {
    DEFAULT_BAN_REASON.to_string()
}

impl BanEntry {
    pub fn new(player: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            identity: player.into(),
            reason: reason.into(),
            extra: Map::new(),
        }
    }

    /// Whether this entry refers to `player` by name or recorded uuid.
    pub fn matches(&self, player: &str) -> bool {
        self.identity == player
            || self.extra.get("uuid").and_then(Value::as_str) == Some(player)
    }
}

/// Check that `name` is a plausible player name.
///
/// Names end up inside console commands, so anything outside
/// `[A-Za-z0-9_.]` is rejected.
pub fn validate_player_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(format!(
            "player name must be 1-{MAX_NAME_LEN} characters, got {}",
            name.len()
        ));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.'))
    {
        return Err(format!("player name contains invalid character {bad:?}"));
    }
    Ok(())
}

/// Check that a free-text argument fits on one console line.
pub fn validate_single_line(field: &str, value: &str) -> Result<(), String> {
    if value.contains(['\n', '\r']) {
        return Err(format!("{field} must not contain line breaks"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_serializes_in_ops_json_shape() {
        let json = serde_json::to_value(OperatorEntry::new("Steve")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "uuid": "Steve",
                "name": "Steve",
                "level": 4,
                "bypassesPlayerLimit": false
            })
        );
    }

    #[test]
    fn operator_defaults_missing_fields() {
        let entry: OperatorEntry =
            serde_json::from_str(r#"{"uuid":"0000-1111","name":"Alex"}"#).unwrap();
        assert_eq!(entry.level, DEFAULT_OP_LEVEL);
        assert!(!entry.bypasses_limit);
        assert!(entry.matches("Alex"));
        assert!(entry.matches("0000-1111"));
        assert!(!entry.matches("Steve"));
    }

    #[test]
    fn ban_entry_keeps_game_written_fields() {
        let raw = r#"{"uuid":"abcd","name":"Griefer","created":"2024-01-01 10:00:00 +0000","source":"Server","expires":"forever","reason":"tnt"}"#;
        let entry: BanEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.identity, "Griefer");
        assert_eq!(entry.reason, "tnt");
        assert!(entry.matches("abcd"));

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["created"], "2024-01-01 10:00:00 +0000");
        assert_eq!(back["expires"], "forever");
    }

    #[test]
    fn validates_player_names() {
        assert!(validate_player_name("Steve_01").is_ok());
        assert!(validate_player_name(".Bedrock").is_ok());
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("two words").is_err());
        assert!(validate_player_name("a\nstop").is_err());
        assert!(validate_player_name(&"x".repeat(33)).is_err());
    }

    #[test]
    fn rejects_multiline_text() {
        assert!(validate_single_line("reason", "griefing spawn").is_ok());
        assert!(validate_single_line("reason", "x\nstop").is_err());
        assert!(validate_single_line("reason", "x\rstop").is_err());
    }
}
