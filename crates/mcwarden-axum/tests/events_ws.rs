//! `/ws` over a real socket: handshake, initial status, then live events.
//!
//! Uses a hand-rolled client since only the first few server frames matter.

#![cfg(unix)]

mod common;

use std::time::Duration;

use mcwarden_axum::{CorsConfig, create_router};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const HANDSHAKE: &str = "GET /ws HTTP/1.1\r\n\
Host: localhost\r\n\
Upgrade: websocket\r\n\
Connection: Upgrade\r\n\
Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
Sec-WebSocket-Version: 13\r\n\r\n";

async fn connect(addr: std::net::SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(HANDSHAKE.as_bytes()).await.unwrap();

    let mut head = Vec::new();
    while !head.ends_with(b"\r\n\r\n") {
        head.push(stream.read_u8().await.unwrap());
    }
    let head = String::from_utf8(head).unwrap();
    assert!(head.starts_with("HTTP/1.1 101"), "unexpected handshake: {head}");
    stream
}

/// Read one unfragmented, unmasked text frame and parse it as JSON.
async fn next_json(stream: &mut TcpStream) -> Value {
    let opcode = stream.read_u8().await.unwrap();
    assert_eq!(opcode, 0x81, "expected a final text frame");

    let len = match stream.read_u8().await.unwrap() {
        126 => usize::from(stream.read_u16().await.unwrap()),
        127 => usize::try_from(stream.read_u64().await.unwrap()).unwrap(),
        n => usize::from(n),
    };
    let mut payload = vec![0; len];
    stream.read_exact(&mut payload).await.unwrap();
    serde_json::from_slice(&payload).unwrap()
}

async fn next_json_matching(stream: &mut TcpStream, pred: impl Fn(&Value) -> bool) -> Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = next_json(stream).await;
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for frame")
}

#[tokio::test]
async fn viewer_gets_status_then_live_events() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = common::context(dir.path(), common::ECHO_SERVER);
    let manager = std::sync::Arc::clone(&ctx.manager);
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let mut stream = connect(addr).await;

    let first = next_json(&mut stream).await;
    assert_eq!(first["type"], "status");
    assert_eq!(first["data"]["running"], false);

    manager.start().await.unwrap();
    let running = next_json_matching(&mut stream, |e| {
        e["type"] == "status" && e["data"]["running"] == true
    })
    .await;
    assert_eq!(running["data"]["maxPlayers"], 20);

    manager.send_command("say from-test").await.unwrap();
    next_json_matching(&mut stream, |e| {
        e == &json!({ "type": "log", "data": { "message": "[Server thread/INFO]: say from-test" } })
    })
    .await;

    manager.shutdown().await.unwrap();
    next_json_matching(&mut stream, |e| {
        e["type"] == "status" && e["data"]["running"] == false
    })
    .await;

    server.abort();
}
