//! WebSocket relay of server events.
//!
//! A viewer first receives the current `status`, then every bus event as a
//! JSON text frame. Anything the viewer sends is ignored; a close frame or
//! socket error ends the relay.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use mcwarden_core::ServerEvent;
use tracing::{debug, warn};

use crate::state::AppState;

/// `GET /ws`
pub async fn stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| relay(socket, state))
}

async fn relay(socket: WebSocket, state: AppState) {
    let (mut sink, mut source) = socket.split();

    // Subscribe before taking the snapshot so nothing falls in between.
    let mut events = state.manager.subscribe();
    let initial = ServerEvent::status(state.manager.snapshot());
    debug!("Event viewer connected");

    let mut egress = tokio::spawn(async move {
        if send_event(&mut sink, &initial).await.is_err() {
            return;
        }
        while let Some(event) = events.recv().await {
            if send_event(&mut sink, &event).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let mut ingest = tokio::spawn(async move {
        while let Some(msg) = source.next().await {
            match msg {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut egress => ingest.abort(),
        _ = &mut ingest => egress.abort(),
    }
    debug!("Event viewer disconnected");
}

async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!(kind = event.kind(), error = %e, "Failed to serialize event");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}
