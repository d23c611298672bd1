//! Per-connection plumbing: splits the socket, runs a write pump fed by
//! this connection's outbound channel, and forwards decoded frames into
//! the single session thread.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use protocol::{Envelope, ErrorPayload, MessageType};

use crate::app_state::{AppState, SessionEvent};
use crate::codec::encode;

const OUTBOUND_BUFFER: usize = 32;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, app_state))
}

async fn handle_socket(stream: WebSocket, app_state: Arc<AppState>) {
    let (mut sink, mut stream_reader) = stream.split();
    let connection_id = app_state.next_connection_id();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);
    let local_outbound = outbound_tx.clone();

    if app_state
        .inbound_tx
        .send(SessionEvent::Connected { connection_id, outbound: outbound_tx })
        .await
        .is_err()
    {
        tracing::error!(connection_id, "session actor is gone, dropping connection");
        return;
    }

    let write_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = stream_reader.next().await {
        match message {
            Ok(Message::Text(text)) => match Envelope::decode(&text) {
                Ok(envelope) => {
                    if app_state
                        .inbound_tx
                        .send(SessionEvent::Frame { connection_id, envelope })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(connection_id, ?err, "decode failure, replying with ERROR");
                    let frame = encode(
                        MessageType::Error,
                        &ErrorPayload { reason: format!("invalid frame: {err}") },
                    );
                    let _ = local_outbound.try_send(frame);
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(connection_id, ?err, "websocket read error");
                break;
            }
        }
    }

    let _ = app_state.inbound_tx.send(SessionEvent::Disconnected { connection_id }).await;
    write_task.abort();
}
