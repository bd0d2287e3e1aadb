//! Message Router
//!
//! Stateless dispatch from inbound client events to hub operations.
//! Membership and chat/mute events take the room fan-out path; negotiation
//! payloads take the unicast-by-identity path, with the true sender
//! stamped here so a client can never impersonate another connection.
//!
//! The router never reports errors back to the sender: malformed or
//! out-of-order events (a signal before any join, a mute with no room)
//! degrade to no-ops, and one connection's bad input never disturbs
//! another connection's session.

use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::{HubError, RelayHub};
use super::messages::{ClientMessage, ServerMessage};
use super::registry::ConnectionId;

/// Routes inbound events from the transport layer into the hub
pub struct MessageRouter {
    hub: Arc<RelayHub>,
}

impl MessageRouter {
    pub fn new(hub: Arc<RelayHub>) -> Self {
        Self { hub }
    }

    /// The hub this router dispatches into
    pub fn hub(&self) -> &Arc<RelayHub> {
        &self.hub
    }

    /// A transport session opened; allocate its identity
    pub async fn connect(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        self.hub.register(sender).await
    }

    /// A transport session closed; release membership and bookkeeping
    pub async fn disconnect(&self, id: &str) {
        self.hub.unregister(id).await;
    }

    /// Dispatch one inbound event from a connection
    pub async fn handle(&self, sender_id: &str, message: ClientMessage) {
        match message {
            ClientMessage::JoinRoom { room } => {
                if room.is_empty() {
                    tracing::debug!(connection_id = %sender_id, "ignoring join with empty room name");
                    return;
                }
                self.hub.join(sender_id, &room).await;
            }
            ClientMessage::Signal { target, sdp, ice } => {
                // Pairwise negotiation is strictly point-to-point; the
                // envelope is stamped with the true sender and routed by
                // identity, not by room.
                self.hub
                    .send_to(
                        &target,
                        ServerMessage::Signal {
                            sender: sender_id.to_string(),
                            sdp,
                            ice,
                        },
                    )
                    .await;
            }
            ClientMessage::ToggleMute { is_muted } => {
                self.hub
                    .broadcast_from(
                        sender_id,
                        ServerMessage::UserMuted {
                            user_id: sender_id.to_string(),
                            is_muted,
                        },
                    )
                    .await;
            }
            ClientMessage::Chat { message } => {
                // The sender renders its own copy locally.
                self.hub
                    .broadcast_from(sender_id, ServerMessage::Chat { message })
                    .await;
            }
        }
    }
}
