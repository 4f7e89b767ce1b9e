//! Public status endpoint. No passcode: the landing page shows it.

use axum::Json;
use axum::extract::State;

use crate::dto::StatusResponse;
use crate::state::AppState;

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        snapshot: state.manager.snapshot(),
        phase: state.manager.phase().to_string(),
        address: state.public_address.clone(),
        port: state.game_port,
    })
}
