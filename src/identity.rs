//! Identity table
//!
//! Maps each live connection to its current username, room, and avatar.
//! One entry per connection: created on first join, overwritten on room
//! switch, deleted on disconnect. Lookup misses are absent values, never
//! errors.

use std::collections::HashMap;

use crate::avatar::Avatar;
use crate::types::{ClientId, RoomName};

/// The (username, room, avatar) triple bound to one live connection
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    /// Current room; `None` only for entries created outside a join path
    pub room: Option<RoomName>,
    pub avatar: Avatar,
}

/// Result of resolving a username to a connection
///
/// Usernames are not unique. Rather than silently picking one match,
/// multiplicity is surfaced so the caller can report an ambiguous
/// recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NotFound,
    Unique(ClientId),
    /// More than one live connection uses this username
    Ambiguous(usize),
}

/// Per-connection identity storage
#[derive(Debug, Default)]
pub struct IdentityTable {
    entries: HashMap<ClientId, Identity>,
}

impl IdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the identity for a connection (idempotent overwrite)
    pub fn set(&mut self, id: ClientId, username: String, room: Option<RoomName>, avatar: Avatar) {
        self.entries.insert(
            id,
            Identity {
                username,
                room,
                avatar,
            },
        );
    }

    pub fn get(&self, id: ClientId) -> Option<&Identity> {
        self.entries.get(&id)
    }

    /// Delete and return the prior identity
    ///
    /// Absent means the connection never joined or disconnect fired
    /// twice; both are tolerated as no-ops by callers.
    pub fn remove(&mut self, id: ClientId) -> Option<Identity> {
        self.entries.remove(&id)
    }

    /// Resolve a username to a connection
    pub fn find_by_username(&self, username: &str) -> Resolution {
        let mut matches = self
            .entries
            .iter()
            .filter(|(_, identity)| identity.username == username);

        match (matches.next(), matches.next()) {
            (None, _) => Resolution::NotFound,
            (Some((id, _)), None) => Resolution::Unique(*id),
            (Some(_), Some(_)) => Resolution::Ambiguous(2 + matches.count()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
