// WebSocket handler: summary lifecycle and UI events

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::SummaryEvent;
use crate::ui_state::UiEvent;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements the /ws/events connection count on drop (connect = +1, drop = -1).
struct WsEventsGuard(Arc<AtomicUsize>);

impl Drop for WsEventsGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

/// Serializes `value` and sends it as a text frame. `Ok(false)` means the client is gone.
async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> anyhow::Result<bool> {
    let json = serde_json::to_string(value)?;
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    Ok(matches!(r, Ok(Ok(()))))
}

pub(super) async fn ws_events(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let conn_count = state.ws_event_connections.clone();
    let repo = state.summary_repo.clone();
    let ui_bus = state.ui_bus.clone();
    ws.on_upgrade(move |socket| async move {
        let mut summary_rx = repo.subscribe();
        let mut ui_rx = ui_bus.subscribe();
        let generation = repo.generation();
        if let Err(e) =
            stream_events(socket, &mut summary_rx, &mut ui_rx, conn_count, generation).await
        {
            tracing::info!("Events stream error: {}", e);
        }
    })
}

async fn stream_events(
    mut socket: WebSocket,
    summary_rx: &mut broadcast::Receiver<SummaryEvent>,
    ui_rx: &mut broadcast::Receiver<UiEvent>,
    conn_count: Arc<AtomicUsize>,
    generation: u64,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsEventsGuard(conn_count);
    tracing::info!("Client connected to events stream");

    let welcome = serde_json::json!({ "type": "info", "generation": generation });
    if !send_json(&mut socket, &welcome).await? {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = summary_rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_json(&mut socket, &event).await? {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/events client lagged, skipped {} summary events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            result = ui_rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_json(&mut socket, &event).await? {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/events client lagged, skipped {} UI events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}
