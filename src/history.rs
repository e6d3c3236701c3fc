//! Per-room message history
//!
//! Keeps a bounded FIFO log of chat messages per room. A room's log is
//! created on its first message, capped at the most recent 100 entries,
//! and dropped entirely when the room empties.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::avatar::Avatar;
use crate::types::RoomName;

/// Maximum messages retained per room
pub const HISTORY_CAPACITY: usize = 100;

/// One chat message as stored and replayed to joiners
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub username: String,
    pub room: String,
    pub message: String,
    /// Send time, serialized as ISO-8601
    pub timestamp: DateTime<Utc>,
    /// Sender's avatar at send time; `None` if the sender never joined
    pub avatar: Option<Avatar>,
}

/// Bounded per-room message logs
#[derive(Debug, Default)]
pub struct HistoryRing {
    logs: HashMap<RoomName, VecDeque<HistoryEntry>>,
}

impl HistoryRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, evicting the oldest entries past the cap
    pub fn append(&mut self, room: RoomName, entry: HistoryEntry) {
        let log = self.logs.entry(room).or_default();
        log.push_back(entry);
        while log.len() > HISTORY_CAPACITY {
            log.pop_front();
        }
    }

    /// Get a room's log, oldest first
    ///
    /// `None` means the room has no history; the coordinator sends no
    /// replay in that case.
    pub fn get(&self, room: &RoomName) -> Option<&VecDeque<HistoryEntry>> {
        self.logs.get(room)
    }

    /// Drop a room's entire log (called when the room empties)
    pub fn clear(&mut self, room: &RoomName) {
        self.logs.remove(room);
    }

    pub fn contains(&self, room: &RoomName) -> bool {
        self.logs.contains_key(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> HistoryEntry {
        HistoryEntry {
            username: "alice".into(),
            room: "lobby".into(),
            message: message.into(),
            timestamp: Utc::now(),
            avatar: None,
        }
    }

    #[test]
    fn test_append_creates_log() {
        let mut ring = HistoryRing::new();
        let room = RoomName::new("lobby");

        assert!(ring.get(&room).is_none());
        ring.append(room.clone(), entry("hi"));
        assert_eq!(ring.get(&room).unwrap().len(), 1);
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut ring = HistoryRing::new();
        let room = RoomName::new("lobby");

        for i in 0..=HISTORY_CAPACITY {
            ring.append(room.clone(), entry(&format!("msg-{i}")));
        }

        let log = ring.get(&room).unwrap();
        assert_eq!(log.len(), HISTORY_CAPACITY);
        // msg-0 evicted; msg-1 .. msg-100 remain in order
        assert_eq!(log.front().unwrap().message, "msg-1");
        assert_eq!(log.back().unwrap().message, format!("msg-{HISTORY_CAPACITY}"));
        for (i, stored) in log.iter().enumerate() {
            assert_eq!(stored.message, format!("msg-{}", i + 1));
        }
    }

    #[test]
    fn test_clear_drops_log() {
        let mut ring = HistoryRing::new();
        let room = RoomName::new("lobby");

        ring.append(room.clone(), entry("hi"));
        ring.clear(&room);
        assert!(ring.get(&room).is_none());
    }

    #[test]
    fn test_timestamp_serializes_iso8601() {
        let json = serde_json::to_string(&entry("hi")).unwrap();
        assert!(json.contains("\"timestamp\":\""));
        assert!(json.contains('T'));
    }
}
