//! Shared helpers: a router around a `sh` script standing in for the game
//! server, plus request shortcuts.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use mcwarden_axum::bootstrap::{AxumContext, CorsConfig};
use mcwarden_axum::{Passcode, create_router};
use mcwarden_core::{LaunchSpec, NoopProvisioner, SupervisorConfig};
use mcwarden_runtime::{
    CommandLauncher, ServerManager, ServerSupervisor, ban_store, operator_store,
};
use serde_json::Value;
use tower::ServiceExt;

pub const PASSCODE: &str = "correct horse";
pub const PUBLIC_ADDRESS: &str = "mc.example.net";

/// Prints a ready line, echoes console input, exits on `stop`.
pub const ECHO_SERVER: &str = r#"echo "[Server thread/INFO]: Done (0.42s)! For help, type \"help\""
while IFS= read -r line; do
  case "$line" in
    stop) echo "[Server thread/INFO]: Stopping the server"; exit 0 ;;
    *) echo "[Server thread/INFO]: $line" ;;
  esac
done"#;

pub fn context(dir: &Path, script: &str) -> AxumContext {
    let config = SupervisorConfig::with_defaults()
        .with_start_timeout(Duration::from_secs(5))
        .with_stop_timeout(Duration::from_secs(5))
        .with_kill_grace(Duration::from_millis(500))
        .with_max_players(20);
    let launcher = CommandLauncher::new(LaunchSpec::new("sh", ["-c", script], dir));
    let supervisor = ServerSupervisor::new(config, Arc::new(launcher));
    let manager = ServerManager::new(
        supervisor,
        Arc::new(NoopProvisioner),
        Arc::new(operator_store(dir)),
        Arc::new(ban_store(dir)),
    );

    AxumContext {
        manager: Arc::new(manager),
        passcode: Passcode::new(PASSCODE),
        public_address: PUBLIC_ADDRESS.to_string(),
        game_port: 25565,
    }
}

/// Router plus a handle on the manager for cleanup.
pub fn app(dir: &Path) -> (Router, Arc<ServerManager>) {
    let ctx = context(dir, ECHO_SERVER);
    let manager = Arc::clone(&ctx.manager);
    (create_router(ctx, &CorsConfig::AllowAll), manager)
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert status and `{success, message}` in one go.
pub async fn expect_action(response: Response<Body>, status: StatusCode, message: &str) {
    assert_eq!(response.status(), status);
    let body = body_json(response).await;
    assert_eq!(body["success"], status.is_success());
    assert_eq!(body["message"], message);
}
