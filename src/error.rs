//! Error types for the chat relay
//!
//! Defines connection-level errors and event send errors.
//! Uses thiserror for ergonomic error definitions.
//!
//! Lookup misses (unknown room, connection, or username) are never
//! errors in this crate: they are absent `Option` values handled as
//! silent no-ops, or surfaced to the affected user as an event (e.g.
//! a private message delivery error).

use thiserror::Error;

/// Connection-level errors
///
/// All variants are fatal to one connection, never to the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (internal channel broken)
    #[error("Channel send error")]
    ChannelSend,
}

/// Event send errors
///
/// Occurs when attempting to send events through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
