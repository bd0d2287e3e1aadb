//! Connection Registry
//!
//! Bookkeeping for live transport sessions. Every WebSocket connection is
//! assigned an opaque identity when it registers and is tracked together
//! with its outbound channel and current room. The registry holds no
//! protocol logic; it exists so the rest of the relay can address
//! connections by identity alone.

use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::ServerMessage;

/// Unique identifier for one live connection
pub type ConnectionId = String;

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    /// Channel sender for this connection
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    /// Room this connection currently belongs to, if any
    pub room: Option<String>,
}

/// Tracks all live connections and their room membership
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh identity for a new connection
    ///
    /// The connection starts with no room.
    pub fn register(&mut self, sender: mpsc::UnboundedSender<ServerMessage>) -> ConnectionId {
        let id = Uuid::new_v4().to_string();
        self.connections
            .insert(id.clone(), ConnectionHandle { sender, room: None });
        id
    }

    /// Remove bookkeeping for a connection
    ///
    /// Idempotent: unregistering an unknown identity returns `None` and
    /// has no other effect.
    pub fn unregister(&mut self, id: &str) -> Option<ConnectionHandle> {
        self.connections.remove(id)
    }

    /// Room the connection currently belongs to
    pub fn room_of(&self, id: &str) -> Option<&str> {
        self.connections.get(id).and_then(|h| h.room.as_deref())
    }

    /// Record the connection's current room (or clear it)
    pub fn set_room(&mut self, id: &str, room: Option<String>) {
        if let Some(handle) = self.connections.get_mut(id) {
            handle.room = room;
        }
    }

    /// Outbound channel for a connection, if it is still live
    pub fn sender(&self, id: &str) -> Option<&mpsc::UnboundedSender<ServerMessage>> {
        self.connections.get(id).map(|h| &h.sender)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.connections.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> mpsc::UnboundedSender<ServerMessage> {
        let (tx, _rx) = mpsc::unbounded_channel();
        tx
    }

    #[test]
    fn test_register_allocates_unique_ids() {
        let mut registry = ConnectionRegistry::new();
        let a = registry.register(channel());
        let b = registry.register(channel());

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&a));
        assert!(registry.contains(&b));
    }

    #[test]
    fn test_new_connection_has_no_room() {
        let mut registry = ConnectionRegistry::new();
        let id = registry.register(channel());
        assert_eq!(registry.room_of(&id), None);
    }

    #[test]
    fn test_set_room_roundtrip() {
        let mut registry = ConnectionRegistry::new();
        let id = registry.register(channel());

        registry.set_room(&id, Some("room-1".to_string()));
        assert_eq!(registry.room_of(&id), Some("room-1"));

        registry.set_room(&id, None);
        assert_eq!(registry.room_of(&id), None);
    }

    #[test]
    fn test_set_room_unknown_id_is_noop() {
        let mut registry = ConnectionRegistry::new();
        registry.set_room("ghost", Some("room-1".to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = ConnectionRegistry::new();
        let id = registry.register(channel());

        assert!(registry.unregister(&id).is_some());
        assert!(registry.unregister(&id).is_none());
        assert!(registry.is_empty());
    }
}
