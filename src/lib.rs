//! Multi-Room WebSocket Chat Relay Library
//!
//! A real-time chat relay built with tokio-tungstenite using the
//! Actor pattern for state management. Clients join named rooms,
//! exchange broadcast and private messages, see typing indicators
//! and reactions, and receive a bounded message history on join.
//!
//! # Features
//! - Named rooms, created on first join and deleted on last leave
//! - Per-room message history (last 100 messages, replayed on join)
//! - Randomly assigned avatars (color + initial)
//! - Room switching with leave/join notices
//! - Typing indicators
//! - Private messages addressed by username
//! - Message reactions
//! - Disconnection handling
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning all state (identity
//!   table, room registry, message history, connection senders)
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use room_relay::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod avatar;
pub mod client;
pub mod error;
pub mod handler;
pub mod history;
pub mod identity;
pub mod message;
pub mod registry;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use avatar::{Avatar, ColorPicker, RandomPicker, AVATAR_COLORS};
pub use client::Client;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use history::{HistoryEntry, HistoryRing, HISTORY_CAPACITY};
pub use identity::{Identity, IdentityTable, Resolution};
pub use message::{ClientEvent, ServerEvent};
pub use registry::{Member, MemberInfo, RoomRegistry};
pub use server::{ChatServer, ServerCommand};
pub use types::{ClientId, RoomName};
