//! Room Directory
//!
//! Maps room names to their member sets. Rooms are created implicitly when
//! the first member is inserted and deleted when the last member is
//! removed, so the directory never accumulates entries for empty rooms.

use std::collections::{HashMap, HashSet};

use super::registry::ConnectionId;

/// Room name → set of member connection identities
#[derive(Default)]
pub struct RoomDirectory {
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to a room, creating the room if absent
    pub fn insert(&mut self, room: &str, id: &str) {
        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(id.to_string());
    }

    /// Remove a member from a room
    ///
    /// Removing the last member deletes the room entry. No-op if either
    /// the room or the membership does not exist.
    pub fn remove(&mut self, room: &str, id: &str) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }

    /// Members of a room excluding one connection, for broadcast fan-out
    pub fn members_except(&self, room: &str, excluded: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .filter(|m| m.as_str() != excluded)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn member_count(&self, room: &str) -> usize {
        self.rooms.get(room).map(HashSet::len).unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_creates_room() {
        let mut rooms = RoomDirectory::new();
        assert_eq!(rooms.room_count(), 0);

        rooms.insert("room-1", "a");
        assert_eq!(rooms.room_count(), 1);
        assert_eq!(rooms.member_count("room-1"), 1);
    }

    #[test]
    fn test_insert_is_set_semantics() {
        let mut rooms = RoomDirectory::new();
        rooms.insert("room-1", "a");
        rooms.insert("room-1", "a");
        assert_eq!(rooms.member_count("room-1"), 1);
    }

    #[test]
    fn test_remove_last_member_reaps_room() {
        let mut rooms = RoomDirectory::new();
        rooms.insert("room-1", "a");
        rooms.insert("room-1", "b");

        rooms.remove("room-1", "a");
        assert_eq!(rooms.room_count(), 1);

        rooms.remove("room-1", "b");
        assert_eq!(rooms.room_count(), 0);
        assert_eq!(rooms.member_count("room-1"), 0);
    }

    #[test]
    fn test_remove_unknown_room_or_member_is_noop() {
        let mut rooms = RoomDirectory::new();
        rooms.insert("room-1", "a");

        rooms.remove("room-2", "a");
        rooms.remove("room-1", "ghost");
        assert_eq!(rooms.member_count("room-1"), 1);
    }

    #[test]
    fn test_members_except_excludes_only_the_given_id() {
        let mut rooms = RoomDirectory::new();
        rooms.insert("room-1", "a");
        rooms.insert("room-1", "b");
        rooms.insert("room-1", "c");

        let mut members = rooms.members_except("room-1", "b");
        members.sort();
        assert_eq!(members, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_members_except_unknown_room_is_empty() {
        let rooms = RoomDirectory::new();
        assert!(rooms.members_except("room-1", "a").is_empty());
    }

    #[test]
    fn test_rejoin_after_reap_recreates_room() {
        let mut rooms = RoomDirectory::new();
        rooms.insert("room-1", "a");
        rooms.remove("room-1", "a");
        assert_eq!(rooms.room_count(), 0);

        rooms.insert("room-1", "b");
        assert_eq!(rooms.room_count(), 1);
        assert_eq!(rooms.member_count("room-1"), 1);
    }
}
