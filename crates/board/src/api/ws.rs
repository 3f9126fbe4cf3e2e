//! Live board channel: `/ws/{client_id}`.
//!
//! Each text frame from the client is a sale. The server writes the history
//! replay, then every broadcast event, as text frames.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::api::AppState;
use crate::broadcast::{Event, Subscription};

pub async fn ws_handler(
    Path(client_id): Path<i64>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, client_id, state))
}

/// OPEN until the client closes, the socket errors, or the writer stops; then CLOSED once.
async fn handle_socket(socket: WebSocket, client_id: i64, state: AppState) {
    let (ws_tx, mut ws_rx) = socket.split();
    let Subscription {
        connection_id,
        replay,
        rx,
        ..
    } = state.board.on_connect(client_id);

    let ping_every = Duration::from_secs(state.config.ws_ping_interval_secs.max(1));
    let mut writer = tokio::spawn(write_events(ws_tx, replay, rx, ping_every));

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    state.board.on_message(client_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(%connection_id, error = %e, "receive failed");
                    break;
                }
            },
            _ = &mut writer => {
                tracing::debug!(%connection_id, "writer stopped");
                break;
            }
        }
    }

    state.board.on_disconnect(connection_id, client_id);
    writer.abort();
}

/// Replay history, then forward live events until the queue closes or a send fails.
async fn write_events(
    mut ws_tx: SplitSink<WebSocket, Message>,
    replay: Vec<Event>,
    mut rx: mpsc::Receiver<Event>,
    ping_every: Duration,
) {
    for event in replay {
        if ws_tx.send(Message::Text(event.to_string().into())).await.is_err() {
            return;
        }
    }

    let mut ping_interval = tokio::time::interval(ping_every);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ping_interval.tick().await;
    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if ws_tx.send(Message::Text(event.to_string().into())).await.is_err() {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                if ws_tx.send(Message::Ping(axum::body::Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }
}
