//! Passcode check for the admin UI login screen.

use axum::Json;
use axum::extract::State;

use crate::dto::{ActionResponse, PasscodeRequest};
use crate::error::HttpError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<PasscodeRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    if !state.passcode.verify(&req.passcode) {
        tracing::info!("Rejected admin login");
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(ActionResponse::ok("Authentication successful")))
}
