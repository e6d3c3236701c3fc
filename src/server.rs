//! ChatServer Actor implementation
//!
//! The central actor that owns all state: connected clients, the
//! identity table, the room registry, and per-room message history.
//! Commands arrive over one mpsc channel and are processed to
//! completion one at a time, so every handler is a critical section
//! without locks.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::avatar::{Avatar, ColorPicker, RandomPicker};
use crate::client::Client;
use crate::history::{HistoryEntry, HistoryRing};
use crate::identity::{IdentityTable, Resolution};
use crate::message::ServerEvent;
use crate::registry::RoomRegistry;
use crate::types::{ClientId, RoomName};

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerEvent>,
    },
    /// Client disconnected (socket closed)
    Disconnect { client_id: ClientId },
    /// Join a room for the first time
    Join {
        client_id: ClientId,
        username: String,
        room: String,
    },
    /// Leave the current room and join another
    ChangeRoom {
        client_id: ClientId,
        username: String,
        room: String,
    },
    /// Broadcast a chat message into a room
    Chat {
        client_id: ClientId,
        username: String,
        room: String,
        message: String,
    },
    /// Typing indicator state change
    Typing {
        client_id: ClientId,
        username: String,
        room: String,
        is_typing: bool,
    },
    /// Direct message addressed by username
    PrivateMessage {
        client_id: ClientId,
        to: String,
        from: String,
        message: String,
    },
    /// Reaction to a message in a room
    MessageReaction {
        client_id: ClientId,
        username: String,
        room: String,
        emoji: String,
        message_index: u64,
    },
}

/// The main ChatServer actor
///
/// Owns the three registries and the per-connection senders. All
/// delivery is fire-and-forget: a failed send means the connection is
/// already going away and its Disconnect will clean up.
pub struct ChatServer {
    /// All connected clients: ClientId -> delivery endpoint
    clients: HashMap<ClientId, Client>,
    /// Per-connection identity (username, room, avatar)
    identities: IdentityTable,
    /// Room membership
    rooms: RoomRegistry,
    /// Bounded per-room message logs
    history: HistoryRing,
    /// Avatar color source (injectable for tests)
    picker: Box<dyn ColorPicker>,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self::with_picker(receiver, Box::new(RandomPicker))
    }

    /// Create a ChatServer with a specific color picker
    pub fn with_picker(receiver: mpsc::Receiver<ServerCommand>, picker: Box<dyn ColorPicker>) -> Self {
        Self {
            clients: HashMap::new(),
            identities: IdentityTable::new(),
            rooms: RoomRegistry::new(),
            history: HistoryRing::new(),
            picker,
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders
    /// are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender).await;
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id).await;
            }
            ServerCommand::Join {
                client_id,
                username,
                room,
            } => {
                self.handle_join(client_id, username, room).await;
            }
            ServerCommand::ChangeRoom {
                client_id,
                username,
                room,
            } => {
                self.handle_change_room(client_id, username, room).await;
            }
            ServerCommand::Chat {
                client_id,
                username,
                room,
                message,
            } => {
                self.handle_chat(client_id, username, room, message).await;
            }
            ServerCommand::Typing {
                client_id,
                username,
                room,
                is_typing,
            } => {
                self.handle_typing(client_id, username, room, is_typing).await;
            }
            ServerCommand::PrivateMessage {
                client_id,
                to,
                from,
                message,
            } => {
                self.handle_private_message(client_id, to, from, message).await;
            }
            ServerCommand::MessageReaction {
                client_id,
                username,
                room,
                emoji,
                message_index,
            } => {
                self.handle_message_reaction(client_id, username, room, emoji, message_index)
                    .await;
            }
        }
    }

    /// Handle new client connection
    async fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerEvent>) {
        info!("Client {} connected", client_id);
        self.clients.insert(client_id, Client::new(client_id, sender));
        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.rooms.room_count()
        );
    }

    /// Handle client disconnection
    ///
    /// Equivalent to an implicit leave. A connection that never joined
    /// any room produces no outbound events.
    async fn handle_disconnect(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);

        if let Some(identity) = self.identities.remove(client_id) {
            if let Some(room) = identity.room {
                self.leave_room(client_id, &identity.username, &room).await;
            }
        }

        self.clients.remove(&client_id);

        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.rooms.room_count()
        );
    }

    /// Handle a first join into a room
    async fn handle_join(&mut self, client_id: ClientId, username: String, room: String) {
        let room = RoomName::from(room);

        self.enter_room(client_id, &username, &room).await;
        self.announce_join(&username, &room).await;

        info!("{} joined room {}", username, room);
    }

    /// Handle a room switch
    ///
    /// Leaves the current room (with leave notice and member-list
    /// refresh to the old room) before joining the new one. A
    /// connection with no prior room skips the leave step silently.
    /// The switcher hears the change confirmation before the new
    /// room's join notices.
    async fn handle_change_room(&mut self, client_id: ClientId, username: String, room: String) {
        if let Some(identity) = self.identities.remove(client_id) {
            if let Some(old_room) = identity.room {
                self.leave_room(client_id, &identity.username, &old_room).await;
            }
        }

        let room = RoomName::from(room);

        self.enter_room(client_id, &username, &room).await;
        self.unicast(
            client_id,
            ServerEvent::RoomChanged {
                room: room.to_string(),
            },
        )
        .await;
        self.announce_join(&username, &room).await;

        info!("{} switched to room {}", username, room);
    }

    /// Helper: register the member and send it history and avatar
    async fn enter_room(&mut self, client_id: ClientId, username: &str, room: &RoomName) {
        let avatar = Avatar::generate(username, self.picker.as_mut());

        self.identities.set(
            client_id,
            username.to_string(),
            Some(room.clone()),
            avatar.clone(),
        );
        self.rooms
            .join(room.clone(), client_id, username.to_string(), avatar.clone());

        // Replay history to the joiner, but only if the room has any
        if let Some(log) = self.history.get(room) {
            let messages = log.iter().cloned().collect();
            self.unicast(client_id, ServerEvent::MessageHistory { messages })
                .await;
        }

        self.unicast(client_id, ServerEvent::AvatarAssigned { avatar })
            .await;
    }

    /// Helper: broadcast the join notice and refreshed member list
    async fn announce_join(&self, username: &str, room: &RoomName) {
        self.broadcast_room(
            room,
            ServerEvent::RoomMessage {
                message: format!("{username} a rejoint le salon {room}."),
            },
        )
        .await;
        self.broadcast_room(
            room,
            ServerEvent::RoomUsers {
                users: self.rooms.members(room),
            },
        )
        .await;
    }

    /// Handle a chat message
    ///
    /// The room name is taken from the payload without checking the
    /// sender's membership; the avatar comes from the sender's current
    /// identity and is absent if it never joined.
    async fn handle_chat(
        &mut self,
        client_id: ClientId,
        username: String,
        room: String,
        message: String,
    ) {
        let room_name = RoomName::new(room.clone());
        let avatar = self.identities.get(client_id).map(|i| i.avatar.clone());

        let entry = HistoryEntry {
            username: username.clone(),
            room,
            message,
            timestamp: Utc::now(),
            avatar,
        };

        let event = ServerEvent::from_entry(&entry);
        self.history.append(room_name.clone(), entry);
        self.broadcast_room(&room_name, event).await;

        debug!("[{}] {} sent a message", room_name, username);
    }

    /// Handle a typing indicator change
    ///
    /// Pure relay to everyone else in the room; no state is stored.
    async fn handle_typing(
        &mut self,
        client_id: ClientId,
        username: String,
        room: String,
        is_typing: bool,
    ) {
        let room = RoomName::new(room);
        self.broadcast_room_except(
            &room,
            client_id,
            ServerEvent::UserTyping { username, is_typing },
        )
        .await;
    }

    /// Handle a private message
    ///
    /// Resolves the recipient by username. An unknown recipient yields
    /// a delivery error to the sender; so does an ambiguous one, since
    /// usernames are not unique and picking an arbitrary match would
    /// misdeliver silently.
    async fn handle_private_message(
        &mut self,
        client_id: ClientId,
        to: String,
        from: String,
        message: String,
    ) {
        match self.identities.find_by_username(&to) {
            Resolution::Unique(recipient_id) => {
                let timestamp = Utc::now();
                let avatar = self.identities.get(client_id).map(|i| i.avatar.clone());

                self.unicast(
                    recipient_id,
                    ServerEvent::PrivateMessage {
                        from: from.clone(),
                        message: message.clone(),
                        timestamp,
                        avatar,
                    },
                )
                .await;

                self.unicast(
                    client_id,
                    ServerEvent::PrivateMessageSent {
                        to: to.clone(),
                        message,
                        timestamp,
                    },
                )
                .await;

                info!("Private message from {} to {}", from, to);
            }
            Resolution::NotFound => {
                self.unicast(
                    client_id,
                    ServerEvent::PrivateMessageError {
                        error: format!("L'utilisateur {to} n'est pas connecté."),
                    },
                )
                .await;
            }
            Resolution::Ambiguous(count) => {
                self.unicast(
                    client_id,
                    ServerEvent::PrivateMessageError {
                        error: format!(
                            "Le nom {to} est ambigu ({count} connexions le partagent)."
                        ),
                    },
                )
                .await;
            }
        }
    }

    /// Handle a message reaction
    ///
    /// Relayed verbatim to the whole room; `message_index` is an opaque
    /// client-side reference and is not validated.
    async fn handle_message_reaction(
        &mut self,
        _client_id: ClientId,
        username: String,
        room: String,
        emoji: String,
        message_index: u64,
    ) {
        let room = RoomName::new(room);
        self.broadcast_room(
            &room,
            ServerEvent::MessageReaction {
                username,
                emoji,
                message_index,
            },
        )
        .await;
    }

    /// Helper: remove a member from its room, clean up if emptied, and
    /// notify the remaining members
    async fn leave_room(&mut self, client_id: ClientId, username: &str, room: &RoomName) {
        let emptied = self.rooms.leave(room, client_id);

        if emptied {
            self.history.clear(room);
            debug!("Room {} deleted (empty)", room);
            return;
        }

        self.broadcast_room(
            room,
            ServerEvent::RoomMessage {
                message: format!("{username} a quitté le salon {room}."),
            },
        )
        .await;
        self.broadcast_room(
            room,
            ServerEvent::RoomUsers {
                users: self.rooms.members(room),
            },
        )
        .await;
    }

    /// Helper: deliver an event to one connection (fire-and-forget)
    async fn unicast(&self, client_id: ClientId, event: ServerEvent) {
        if let Some(client) = self.clients.get(&client_id) {
            let _ = client.send(event).await;
        }
    }

    /// Helper: deliver an event to every member of a room
    async fn broadcast_room(&self, room: &RoomName, event: ServerEvent) {
        for id in self.rooms.member_ids(room) {
            if let Some(client) = self.clients.get(&id) {
                let _ = client.send(event.clone()).await;
            }
        }
    }

    /// Helper: deliver an event to every member of a room except one
    async fn broadcast_room_except(&self, room: &RoomName, except: ClientId, event: ServerEvent) {
        for id in self.rooms.member_ids(room) {
            if id == except {
                continue;
            }
            if let Some(client) = self.clients.get(&id) {
                let _ = client.send(event.clone()).await;
            }
        }
    }
}
