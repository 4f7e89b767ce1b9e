//! Axum-specific error types and mappings.
//!
//! Maps [`SupervisorError`] onto HTTP status codes. Every failure body has
//! the same `{ "success": false, "message": ... }` shape the admin UI reads.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mcwarden_core::SupervisorError;
use thiserror::Error;

use crate::dto::ActionResponse;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Missing or wrong passcode.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request (invalid input).
    #[error("{0}")]
    BadRequest(String),

    /// The request conflicts with the current lifecycle phase.
    #[error("{0}")]
    Conflict(String),

    /// The game server process could not be launched.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// The game server did not become ready in time.
    #[error("{0}")]
    GatewayTimeout(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, axum::Json(ActionResponse::failure(self.to_string()))).into_response()
    }
}

impl From<SupervisorError> for HttpError {
    fn from(err: SupervisorError) -> Self {
        let message = err.to_string();
        match err {
            SupervisorError::AlreadyRunning
            | SupervisorError::NotRunning
            | SupervisorError::OperationInProgress => Self::Conflict(message),
            SupervisorError::InvalidInput(msg) => Self::BadRequest(msg),
            SupervisorError::StartTimeout(_) => Self::GatewayTimeout(message),
            SupervisorError::Spawn(_) => Self::ServiceUnavailable(message),
            SupervisorError::StartFailed { .. }
            | SupervisorError::CommandWrite(_)
            | SupervisorError::Persistence(_)
            | SupervisorError::Provision(_) => Self::Internal(message),
        }
    }
}
