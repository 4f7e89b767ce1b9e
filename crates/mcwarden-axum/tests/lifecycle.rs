//! Start, console, operator/ban and stop through the HTTP surface, with a
//! `sh` script as the game server.

#![cfg(unix)]

mod common;

use axum::http::StatusCode;
use common::{PASSCODE, app, body_json, expect_action, get, post_json};
use serde_json::json;

#[tokio::test]
async fn full_admin_session() {
    let dir = tempfile::tempdir().unwrap();
    let (app, manager) = app(dir.path());

    let response = post_json(&app, "/api/server/start", json!({ "passcode": PASSCODE })).await;
    expect_action(response, StatusCode::OK, "Server started successfully").await;

    let status = body_json(get(&app, "/api/status").await).await;
    assert_eq!(status["running"], true);
    assert_eq!(status["phase"], "running");

    let response = post_json(
        &app,
        "/api/server/command",
        json!({ "passcode": PASSCODE, "command": " say hello " }),
    )
    .await;
    expect_action(response, StatusCode::OK, "Command sent: say hello").await;

    let response = post_json(
        &app,
        "/api/ops/add",
        json!({ "passcode": PASSCODE, "player": "Alex" }),
    )
    .await;
    expect_action(
        response,
        StatusCode::OK,
        "Alex has been granted operator privileges",
    )
    .await;

    let ops = body_json(get(&app, "/api/ops?passcode=correct%20horse").await).await;
    assert_eq!(ops["ops"][0]["name"], "Alex");
    assert_eq!(ops["ops"][0]["level"], 4);

    let response = post_json(
        &app,
        "/api/ban/add",
        json!({ "passcode": PASSCODE, "player": "Griefer" }),
    )
    .await;
    expect_action(response, StatusCode::OK, "Griefer has been banned").await;

    let bans = body_json(get(&app, "/api/bans?passcode=correct%20horse").await).await;
    assert_eq!(bans["bans"][0]["name"], "Griefer");
    assert_eq!(bans["bans"][0]["reason"], "No reason provided");

    let response = post_json(
        &app,
        "/api/ban/remove",
        json!({ "passcode": PASSCODE, "player": "Griefer" }),
    )
    .await;
    expect_action(response, StatusCode::OK, "Griefer has been unbanned").await;

    let response = post_json(
        &app,
        "/api/ops/remove",
        json!({ "passcode": PASSCODE, "player": "Alex" }),
    )
    .await;
    expect_action(
        response,
        StatusCode::OK,
        "Alex operator privileges have been revoked",
    )
    .await;

    let response = post_json(&app, "/api/server/stop", json!({ "passcode": PASSCODE })).await;
    expect_action(response, StatusCode::OK, "Server stopped successfully").await;

    let status = body_json(get(&app, "/api/status").await).await;
    assert_eq!(status["running"], false);

    manager.shutdown().await.unwrap();
}

#[tokio::test]
async fn second_start_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let (app, manager) = app(dir.path());

    let response = post_json(&app, "/api/server/start", json!({ "passcode": PASSCODE })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/api/server/start", json!({ "passcode": PASSCODE })).await;
    expect_action(response, StatusCode::CONFLICT, "Server is already running").await;

    manager.shutdown().await.unwrap();
}

#[tokio::test]
async fn restart_from_running_comes_back_up() {
    let dir = tempfile::tempdir().unwrap();
    let (app, manager) = app(dir.path());

    let response = post_json(&app, "/api/server/start", json!({ "passcode": PASSCODE })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/api/server/restart", json!({ "passcode": PASSCODE })).await;
    expect_action(response, StatusCode::OK, "Server restarted successfully").await;

    let status = body_json(get(&app, "/api/status").await).await;
    assert_eq!(status["running"], true);

    manager.shutdown().await.unwrap();
}

#[tokio::test]
async fn crash_during_startup_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = common::context(dir.path(), "echo booting; exit 1");
    let app = mcwarden_axum::create_router(ctx, &mcwarden_axum::CorsConfig::AllowAll);

    let response = post_json(&app, "/api/server/start", json!({ "passcode": PASSCODE })).await;
    expect_action(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Server failed to start (exit code: 1)",
    )
    .await;
}
