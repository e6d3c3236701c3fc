//! Room registry
//!
//! Maps each room name to its set of members. Rooms are created on
//! first join and deleted when the last member leaves; an empty room
//! never lingers in the registry. Membership is keyed by `ClientId`
//! inside each room, so a repeated join by the same connection
//! overwrites its record instead of accumulating duplicates.

use std::collections::HashMap;

use serde::Serialize;

use crate::avatar::Avatar;
use crate::types::{ClientId, RoomName};

/// Membership record stored per room
#[derive(Debug, Clone)]
pub struct Member {
    pub username: String,
    pub avatar: Avatar,
}

/// Snapshot of one member, as sent in `room users` events
#[derive(Debug, Clone, Serialize)]
pub struct MemberInfo {
    pub id: String,
    pub username: String,
    pub avatar: Avatar,
}

/// All active rooms and their members
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomName, HashMap<ClientId, Member>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to a room, creating the room on first join
    ///
    /// A repeated join by the same connection overwrites its record
    /// (idempotent, no duplicate membership).
    pub fn join(&mut self, room: RoomName, id: ClientId, username: String, avatar: Avatar) {
        self.rooms
            .entry(room)
            .or_default()
            .insert(id, Member { username, avatar });
    }

    /// Remove a member from a room
    ///
    /// Returns true when the room became empty and was deleted, so the
    /// caller can drop its message history. Removing an unknown member
    /// or room is a silent no-op returning false.
    pub fn leave(&mut self, room: &RoomName, id: ClientId) -> bool {
        let Some(members) = self.rooms.get_mut(room) else {
            return false;
        };

        members.remove(&id);

        if members.is_empty() {
            self.rooms.remove(room);
            true
        } else {
            false
        }
    }

    /// Snapshot the members of a room
    ///
    /// An unknown room yields an empty list, never an error.
    pub fn members(&self, room: &RoomName) -> Vec<MemberInfo> {
        self.rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .map(|(id, member)| MemberInfo {
                        id: id.to_string(),
                        username: member.username.clone(),
                        avatar: member.avatar.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Connection IDs of a room's members, for fanout
    pub fn member_ids(&self, room: &RoomName) -> Vec<ClientId> {
        self.rooms
            .get(room)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Whether a room currently exists (has at least one member)
    pub fn contains(&self, room: &RoomName) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::{Avatar, FixedPicker};

    fn avatar(name: &str) -> Avatar {
        Avatar::generate(name, &mut FixedPicker(0))
    }

    #[test]
    fn test_join_creates_room() {
        let mut registry = RoomRegistry::new();
        let room = RoomName::new("lobby");

        assert!(!registry.contains(&room));
        registry.join(room.clone(), ClientId::new(), "alice".into(), avatar("alice"));
        assert!(registry.contains(&room));
        assert_eq!(registry.members(&room).len(), 1);
    }

    #[test]
    fn test_repeated_join_is_idempotent() {
        let mut registry = RoomRegistry::new();
        let room = RoomName::new("lobby");
        let id = ClientId::new();

        registry.join(room.clone(), id, "alice".into(), avatar("alice"));
        registry.join(room.clone(), id, "alice".into(), avatar("alice"));

        assert_eq!(registry.members(&room).len(), 1);
    }

    #[test]
    fn test_last_leave_deletes_room() {
        let mut registry = RoomRegistry::new();
        let room = RoomName::new("lobby");
        let alice = ClientId::new();
        let bob = ClientId::new();

        registry.join(room.clone(), alice, "alice".into(), avatar("alice"));
        registry.join(room.clone(), bob, "bob".into(), avatar("bob"));

        assert!(!registry.leave(&room, alice));
        assert!(registry.contains(&room));
        assert!(registry.leave(&room, bob));
        assert!(!registry.contains(&room));
    }

    #[test]
    fn test_leave_unknown_is_noop() {
        let mut registry = RoomRegistry::new();
        let room = RoomName::new("ghost");

        assert!(!registry.leave(&room, ClientId::new()));
        assert!(registry.members(&room).is_empty());
    }
}
