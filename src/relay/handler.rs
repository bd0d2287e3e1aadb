//! WebSocket Transport Adapter
//!
//! Handles WebSocket upgrade requests and runs the per-connection socket
//! pump: one task drains the connection's outbound channel into the
//! socket, one task feeds inbound frames to the router, and whichever
//! half ends first tears the other down and releases the session.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::{ClientMessage, ServerMessage};
use super::router::MessageRouter;
use crate::api::AppState;

/// WebSocket upgrade handler
///
/// Entry point for signaling connections at `GET /ws`.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let router = Arc::clone(&state.router);
    ws.on_upgrade(move |socket| handle_socket(socket, router))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, router: Arc<MessageRouter>) {
    let (mut sender, mut receiver) = socket.split();

    // Channel the hub uses to reach this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let connection_id = match router.connect(tx).await {
        Ok(id) => id,
        Err(e) => {
            // At capacity the socket is simply closed; the protocol has
            // no error events.
            tracing::warn!(error = %e, "rejecting connection");
            return;
        }
    };

    // Tell the client its own identity before anything else can arrive.
    let connected = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    let handshake = match serde_json::to_string(&connected) {
        Ok(text) => sender.send(Message::Text(text)).await,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize handshake");
            router.disconnect(&connection_id).await;
            return;
        }
    };
    if handshake.is_err() {
        tracing::debug!(connection_id = %connection_id, "connection closed before handshake");
        router.disconnect(&connection_id).await;
        return;
    }

    let conn_id_for_send = connection_id.clone();

    // Task to forward messages from the channel to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        tracing::debug!(
                            connection_id = %conn_id_for_send,
                            "send failed, closing connection"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize message");
                }
            }
        }
    });

    let router_for_recv = Arc::clone(&router);
    let conn_id_for_recv = connection_id.clone();

    // Task to receive frames from the socket and route them
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_frame(&router_for_recv, &conn_id_for_recv, msg).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "receive error"
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    // Leaves the room (announcing user-left) and drops the identity.
    router.disconnect(&connection_id).await;
}

/// Handle one received WebSocket frame
///
/// Returns false if the connection should be closed. Frames the relay
/// cannot interpret are dropped without an answer.
async fn handle_frame(router: &Arc<MessageRouter>, connection_id: &str, frame: Message) -> bool {
    match frame {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(message) => {
                    router.handle(connection_id, message).await;
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "dropping malformed frame"
                    );
                }
            }
            true
        }
        Message::Binary(_) => {
            tracing::debug!(connection_id = %connection_id, "dropping binary frame");
            true
        }
        Message::Ping(_) | Message::Pong(_) => {
            // The WebSocket layer owns keepalive.
            true
        }
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "client requested close");
            false
        }
    }
}
