//! Server lifecycle and console handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::{ActionResponse, CommandRequest, PasscodeRequest};
use crate::error::HttpError;
use crate::state::AppState;

/// Start the game server and wait until it is ready.
pub async fn start(
    State(state): State<AppState>,
    Json(req): Json<PasscodeRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    state.passcode.authorize(&req.passcode)?;
    state.manager.start().await?;
    Ok(Json(ActionResponse::ok("Server started successfully")))
}

/// Stop the game server and wait for it to exit.
pub async fn stop(
    State(state): State<AppState>,
    Json(req): Json<PasscodeRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    state.passcode.authorize(&req.passcode)?;
    let exit_code = state.manager.stop().await?;
    tracing::debug!(?exit_code, "Stopped via API");
    Ok(Json(ActionResponse::ok("Server stopped successfully")))
}

pub async fn restart(
    State(state): State<AppState>,
    Json(req): Json<PasscodeRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    state.passcode.authorize(&req.passcode)?;
    state.manager.restart().await?;
    Ok(Json(ActionResponse::ok("Server restarted successfully")))
}

/// Write one line to the server console.
pub async fn command(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    state.passcode.authorize(&req.passcode)?;
    state.manager.send_command(&req.command).await?;
    Ok(Json(ActionResponse::ok(format!(
        "Command sent: {}",
        req.command.trim()
    ))))
}
