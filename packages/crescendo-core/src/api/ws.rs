//! WebSocket event feed.
//!
//! Every connected client receives each [`RoomEvent`] as a JSON text frame.
//! An optional `?room=<id>` query narrows the feed to a single room.
//!
//! [`RoomEvent`]: crate::events::RoomEvent

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::api::AppState;
use crate::room::RoomId;

#[derive(Debug, Deserialize)]
pub struct EventFilter {
    room: Option<RoomId>,
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(filter): Query<EventFilter>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state, filter.room))
}

async fn handle_ws(socket: WebSocket, state: AppState, room: Option<RoomId>) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.event_bridge.subscribe();

    log::info!("[WS] Client connected (room filter: {:?})", room);

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // The feed is one-way; pings are answered by axum.
                    _ => {}
                }
            }
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("[WS] Client lagged, skipped {} event(s)", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                if room.is_some_and(|room| room != event.room_id()) {
                    continue;
                }
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("[WS] Failed to serialize event: {}", e),
                }
            }
        }
    }

    log::info!("[WS] Client disconnected");
}
