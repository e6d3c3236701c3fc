//! Client struct definition
//!
//! Represents a connected client as a fanout target: its ID and the
//! channel used to push server events to its socket. Username, room,
//! and avatar live in the identity table, not here.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerEvent;
use crate::types::ClientId;

/// A connected client's delivery endpoint
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this connection
    pub id: ClientId,
    /// Server → Client event channel
    pub sender: mpsc::Sender<ServerEvent>,
}

impl Client {
    /// Create a new client with the given ID and sender channel
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self { id, sender }
    }

    /// Send an event to this client
    ///
    /// Returns an error if the channel is closed (client disconnected).
    /// Callers treat failures as fire-and-forget.
    pub async fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_send() {
        let (tx, mut rx) = mpsc::channel(32);
        let client = Client::new(ClientId::new(), tx);

        client
            .send(ServerEvent::RoomChanged {
                room: "lobby".to_string(),
            })
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            ServerEvent::RoomChanged { room } => assert_eq!(room, "lobby"),
            other => panic!("Unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_send_closed_channel() {
        let (tx, rx) = mpsc::channel(32);
        drop(rx);
        let client = Client::new(ClientId::new(), tx);

        let result = client
            .send(ServerEvent::RoomChanged {
                room: "lobby".to_string(),
            })
            .await;

        assert!(result.is_err());
    }
}
