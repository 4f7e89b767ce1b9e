//! Request bodies.

use serde::Deserialize;

/// Body carrying only the passcode (`/auth`, `/server/start|stop|restart`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PasscodeRequest {
    pub passcode: String,
}

/// Query string for the list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PasscodeQuery {
    pub passcode: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommandRequest {
    pub passcode: String,
    pub command: String,
}

/// Operator grant/revoke and unban.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlayerRequest {
    pub passcode: String,
    pub player: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BanRequest {
    pub passcode: String,
    pub player: String,
    pub reason: Option<String>,
}
