//! Relay Hub
//!
//! Owns the connection registry and room directory behind a single lock
//! and exposes the two dispatch paths the relay is built on: unicast by
//! connection identity and room-scoped fan-out that excludes the
//! originator.
//!
//! Every membership mutation (join, leave, disconnect) and the broadcast
//! it triggers happen inside one write-lock critical section, so a
//! fan-out list can never be computed against a half-updated member set.

use thiserror::Error;
use tokio::sync::{mpsc, RwLock};

use super::messages::ServerMessage;
use super::registry::{ConnectionId, ConnectionRegistry};
use super::rooms::RoomDirectory;

/// Configuration for the relay hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// Registry and directory under one lock; see module docs
struct RelayState {
    registry: ConnectionRegistry,
    rooms: RoomDirectory,
}

impl RelayState {
    /// Remove the connection from its current room, if any
    ///
    /// Returns the room name and the members remaining in it, so the
    /// caller can announce the departure within the same critical section.
    fn leave_current(&mut self, id: &str) -> Option<(String, Vec<ConnectionId>)> {
        let room = self.registry.room_of(id)?.to_string();
        self.rooms.remove(&room, id);
        self.registry.set_room(id, None);
        let remaining = self.rooms.members_except(&room, id);
        Some((room, remaining))
    }

    /// Push a message onto each recipient's outbound channel
    ///
    /// A recipient whose channel is gone is skipped; the transport layer
    /// owns undeliverable sends.
    fn deliver(&self, recipients: &[ConnectionId], message: &ServerMessage) {
        for id in recipients {
            if let Some(sender) = self.registry.sender(id) {
                let _ = sender.send(message.clone());
            }
        }
    }
}

/// Manages all relay connections and room membership
pub struct RelayHub {
    state: RwLock<RelayState>,
    config: HubConfig,
}

impl RelayHub {
    /// Create a new relay hub
    pub fn new(config: HubConfig) -> Self {
        Self {
            state: RwLock::new(RelayState {
                registry: ConnectionRegistry::new(),
                rooms: RoomDirectory::new(),
            }),
            config,
        }
    }

    /// Register a new connection
    ///
    /// Returns the allocated connection identity, or an error if the
    /// connection limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut state = self.state.write().await;
        if state.registry.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = state.registry.register(sender);
        tracing::info!(connection_id = %id, "connection opened");
        Ok(id)
    }

    /// Remove a connection, announcing `user-left` to its former room
    ///
    /// Idempotent: unregistering an unknown identity emits nothing.
    pub async fn unregister(&self, id: &str) {
        let mut state = self.state.write().await;

        if let Some((room, remaining)) = state.leave_current(id) {
            state.deliver(
                &remaining,
                &ServerMessage::UserLeft {
                    user_id: id.to_string(),
                },
            );
            tracing::debug!(connection_id = %id, room = %room, "left room");
        }

        if state.registry.unregister(id).is_some() {
            tracing::info!(connection_id = %id, "connection closed");
        }
    }

    /// Move a connection into a room, announcing the membership change
    ///
    /// Last join wins: membership in a previous room is replaced, and the
    /// old room hears the same `user-left` a disconnect would produce.
    /// Existing members of the new room receive `user-joined`; the joiner
    /// itself receives nothing. The whole transition is one critical
    /// section.
    pub async fn join(&self, id: &str, room: &str) {
        let mut state = self.state.write().await;
        if !state.registry.contains(id) {
            return;
        }

        if let Some((old_room, remaining)) = state.leave_current(id) {
            state.deliver(
                &remaining,
                &ServerMessage::UserLeft {
                    user_id: id.to_string(),
                },
            );
            tracing::debug!(connection_id = %id, room = %old_room, "left room");
        }

        // Membership is applied before the fan-out list is computed; the
        // list excludes the joiner.
        state.rooms.insert(room, id);
        state.registry.set_room(id, Some(room.to_string()));

        let peers = state.rooms.members_except(room, id);
        state.deliver(
            &peers,
            &ServerMessage::UserJoined {
                user_id: id.to_string(),
            },
        );
        tracing::info!(connection_id = %id, room = %room, peers = peers.len(), "joined room");
    }

    /// Unicast a message to one connection by identity
    ///
    /// Routing ignores room membership entirely. A stale or unknown
    /// target drops the message; nothing is reported to the sender.
    pub async fn send_to(&self, id: &str, message: ServerMessage) {
        let state = self.state.read().await;
        match state.registry.sender(id) {
            Some(sender) => {
                let _ = sender.send(message);
            }
            None => {
                tracing::debug!(target = %id, "dropping message for unknown connection");
            }
        }
    }

    /// Fan a message out to the sender's room, excluding the sender
    ///
    /// No-op when the sender has no current room.
    pub async fn broadcast_from(&self, id: &str, message: ServerMessage) {
        let state = self.state.read().await;
        let Some(room) = state.registry.room_of(id) else {
            tracing::debug!(connection_id = %id, "dropping broadcast from roomless connection");
            return;
        };

        let recipients = state.rooms.members_except(room, id);
        state.deliver(&recipients, &message);
    }

    /// Current number of live connections
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.registry.len()
    }

    /// Current number of non-empty rooms
    pub async fn room_count(&self) -> usize {
        self.state.read().await.rooms.room_count()
    }
}

/// Errors that can occur in the relay hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("too many connections (limit: {0})")]
    TooManyConnections(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    async fn connect(hub: &RelayHub) -> (ConnectionId, UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        (id, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = RelayHub::new(HubConfig::default());
        let (id, _rx) = connect(&hub).await;

        assert!(!id.is_empty());
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = RelayHub::new(HubConfig { max_connections: 2 });

        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let (tx3, _rx3) = mpsc::unbounded_channel();

        hub.register(tx1).await.unwrap();
        hub.register(tx2).await.unwrap();
        let result = hub.register(tx3).await;

        assert!(matches!(
            result,
            Err(HubError::TooManyConnections(2))
        ));
        assert_eq!(hub.connection_count().await, 2);
    }

    #[tokio::test]
    async fn test_join_announces_to_existing_members_only() {
        let hub = RelayHub::new(HubConfig::default());
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;

        hub.join(&a, "room-1").await;
        // First member: nobody to announce to.
        assert!(drain(&mut rx_a).is_empty());

        hub.join(&b, "room-1").await;
        // A hears about B; B hears nothing about its own join.
        let to_a = drain(&mut rx_a);
        assert_eq!(to_a.len(), 1);
        assert!(
            matches!(&to_a[0], ServerMessage::UserJoined { user_id } if *user_id == b)
        );
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn test_rejoin_replaces_membership_with_synthetic_leave() {
        let hub = RelayHub::new(HubConfig::default());
        let (a, mut rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;
        let (c, mut rx_c) = connect(&hub).await;

        hub.join(&a, "room-1").await;
        hub.join(&c, "room-2").await;
        hub.join(&b, "room-1").await;
        drain(&mut rx_a);

        // B moves to room-2 without an explicit leave.
        hub.join(&b, "room-2").await;

        let to_a = drain(&mut rx_a);
        assert_eq!(to_a.len(), 1);
        assert!(
            matches!(&to_a[0], ServerMessage::UserLeft { user_id } if *user_id == b)
        );

        let to_c = drain(&mut rx_c);
        assert_eq!(to_c.len(), 1);
        assert!(
            matches!(&to_c[0], ServerMessage::UserJoined { user_id } if *user_id == b)
        );
    }

    #[tokio::test]
    async fn test_unregister_announces_user_left_to_former_room() {
        let hub = RelayHub::new(HubConfig::default());
        let (a, mut rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;

        hub.join(&a, "room-1").await;
        hub.join(&b, "room-1").await;
        drain(&mut rx_a);

        hub.unregister(&b).await;

        let to_a = drain(&mut rx_a);
        assert_eq!(to_a.len(), 1);
        assert!(
            matches!(&to_a[0], ServerMessage::UserLeft { user_id } if *user_id == b)
        );
    }

    #[tokio::test]
    async fn test_unregister_twice_emits_nothing_extra() {
        let hub = RelayHub::new(HubConfig::default());
        let (a, mut rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;

        hub.join(&a, "room-1").await;
        hub.join(&b, "room-1").await;
        drain(&mut rx_a);

        hub.unregister(&b).await;
        drain(&mut rx_a);

        hub.unregister(&b).await;
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_send_to_reaches_only_the_target() {
        let hub = RelayHub::new(HubConfig::default());
        let (_a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;

        hub.send_to(
            &b,
            ServerMessage::Chat {
                message: "direct".to_string(),
            },
        )
        .await;

        assert_eq!(drain(&mut rx_b).len(), 1);
        assert!(drain(&mut rx_a).is_empty());
    }

    #[tokio::test]
    async fn test_send_to_unknown_target_is_dropped() {
        let hub = RelayHub::new(HubConfig::default());
        let (_a, mut rx_a) = connect(&hub).await;

        hub.send_to(
            "ghost",
            ServerMessage::Chat {
                message: "lost".to_string(),
            },
        )
        .await;

        assert!(drain(&mut rx_a).is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_from_excludes_sender_and_other_rooms() {
        let hub = RelayHub::new(HubConfig::default());
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        let (c, mut rx_c) = connect(&hub).await;

        hub.join(&a, "room-1").await;
        hub.join(&b, "room-1").await;
        hub.join(&c, "room-2").await;
        drain(&mut rx_a);

        hub.broadcast_from(
            &b,
            ServerMessage::Chat {
                message: "hi".to_string(),
            },
        )
        .await;

        assert_eq!(drain(&mut rx_a).len(), 1);
        assert!(drain(&mut rx_b).is_empty());
        assert!(drain(&mut rx_c).is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_from_roomless_connection_is_noop() {
        let hub = RelayHub::new(HubConfig::default());
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        hub.join(&b, "room-1").await;

        hub.broadcast_from(
            &a,
            ServerMessage::Chat {
                message: "void".to_string(),
            },
        )
        .await;

        assert!(drain(&mut rx_a).is_empty());
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn test_empty_rooms_are_reaped() {
        let hub = RelayHub::new(HubConfig::default());
        let (a, _rx_a) = connect(&hub).await;

        hub.join(&a, "room-1").await;
        assert_eq!(hub.room_count().await, 1);

        hub.unregister(&a).await;
        assert_eq!(hub.room_count().await, 0);
    }
}
