//! Operator and ban list handlers.

use axum::Json;
use axum::extract::{Query, State};

use crate::dto::{
    ActionResponse, BanRequest, BansResponse, OpsResponse, PasscodeQuery, PlayerRequest,
};
use crate::error::HttpError;
use crate::state::AppState;

pub async fn list_ops(
    State(state): State<AppState>,
    Query(query): Query<PasscodeQuery>,
) -> Result<Json<OpsResponse>, HttpError> {
    state.passcode.authorize(&query.passcode)?;
    let ops = state.manager.list_operators().await?;
    Ok(Json(OpsResponse { success: true, ops }))
}

pub async fn add_op(
    State(state): State<AppState>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    state.passcode.authorize(&req.passcode)?;
    state.manager.add_operator(&req.player).await?;
    Ok(Json(ActionResponse::ok(format!(
        "{} has been granted operator privileges",
        req.player
    ))))
}

pub async fn remove_op(
    State(state): State<AppState>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    state.passcode.authorize(&req.passcode)?;
    state.manager.remove_operator(&req.player).await?;
    Ok(Json(ActionResponse::ok(format!(
        "{} operator privileges have been revoked",
        req.player
    ))))
}

pub async fn list_bans(
    State(state): State<AppState>,
    Query(query): Query<PasscodeQuery>,
) -> Result<Json<BansResponse>, HttpError> {
    state.passcode.authorize(&query.passcode)?;
    let bans = state.manager.list_bans().await?;
    Ok(Json(BansResponse {
        success: true,
        bans,
    }))
}

pub async fn ban(
    State(state): State<AppState>,
    Json(req): Json<BanRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    state.passcode.authorize(&req.passcode)?;
    state
        .manager
        .ban_player(&req.player, req.reason.as_deref())
        .await?;
    Ok(Json(ActionResponse::ok(format!(
        "{} has been banned",
        req.player
    ))))
}

pub async fn unban(
    State(state): State<AppState>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    state.passcode.authorize(&req.passcode)?;
    state.manager.unban_player(&req.player).await?;
    Ok(Json(ActionResponse::ok(format!(
        "{} has been unbanned",
        req.player
    ))))
}
