//! Message protocol definitions
//!
//! JSON-based bidirectional event protocol using Serde's tagged enum
//! for type-safe serialization/deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::avatar::Avatar;
use crate::history::HistoryEntry;
use crate::registry::MemberInfo;

/// Client → Server event
///
/// All events a client can send. Uses tagged enum with snake_case naming.
/// Disconnect is implicit from the socket closing, not a wire event.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join a room for the first time
    JoinRoom { username: String, room: String },
    /// Leave the current room and join another
    ChangeRoom { username: String, room: String },
    /// Broadcast a chat message into a room
    Chat {
        username: String,
        room: String,
        message: String,
    },
    /// Typing indicator state change
    Typing {
        username: String,
        room: String,
        is_typing: bool,
    },
    /// Direct message to a username
    PrivateMessage {
        to: String,
        from: String,
        message: String,
    },
    /// React to a message in a room
    MessageReaction {
        username: String,
        room: String,
        emoji: String,
        message_index: u64,
    },
}

/// Server → Client event
///
/// All events the server can deliver. Uses tagged enum with snake_case naming.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Replay of a room's message history (joining connection only)
    MessageHistory { messages: Vec<HistoryEntry> },
    /// Avatar generated for this connection (joining/switching connection only)
    AvatarAssigned { avatar: Avatar },
    /// System notice shown to a whole room
    RoomMessage { message: String },
    /// Refreshed member list for a whole room
    RoomUsers { users: Vec<MemberInfo> },
    /// Confirmation of a room switch (switching connection only)
    RoomChanged { room: String },
    /// A chat message fanned out to a whole room
    Chat {
        username: String,
        room: String,
        message: String,
        timestamp: DateTime<Utc>,
        avatar: Option<Avatar>,
    },
    /// Someone else's typing state changed
    UserTyping { username: String, is_typing: bool },
    /// Incoming private message (recipient only)
    PrivateMessage {
        from: String,
        message: String,
        timestamp: DateTime<Utc>,
        avatar: Option<Avatar>,
    },
    /// Delivery confirmation for a private message (sender only)
    PrivateMessageSent {
        to: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// Private message could not be delivered (sender only)
    PrivateMessageError { error: String },
    /// A reaction fanned out to a whole room
    MessageReaction {
        username: String,
        emoji: String,
        message_index: u64,
    },
}

impl ServerEvent {
    /// Build a chat fanout event from a stored history entry
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        ServerEvent::Chat {
            username: entry.username.clone(),
            room: entry.room.clone(),
            message: entry.message.clone(),
            timestamp: entry.timestamp,
            avatar: entry.avatar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_deserialize() {
        let json = r#"{"type": "join_room", "username": "alice", "room": "lobby"}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        match event {
            ClientEvent::JoinRoom { username, room } => {
                assert_eq!(username, "alice");
                assert_eq!(room, "lobby");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_typing_deserialize() {
        let json = r#"{"type": "typing", "username": "alice", "room": "lobby", "is_typing": true}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        match event {
            ClientEvent::Typing { is_typing, .. } => assert!(is_typing),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_server_event_serialize() {
        let event = ServerEvent::RoomChanged {
            room: "games".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"room_changed\""));
        assert!(json.contains("\"room\":\"games\""));
    }

    #[test]
    fn test_private_message_error_serialize() {
        let event = ServerEvent::PrivateMessageError {
            error: "L'utilisateur bob n'est pas connecté.".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"private_message_error\""));
    }
}
