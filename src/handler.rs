//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake,
//! event parsing, and bidirectional communication with the ChatServer.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::message::{ClientEvent, ServerEvent};
use crate::server::ServerCommand;
use crate::types::ClientId;

/// Handle a new TCP connection
///
/// Performs WebSocket handshake, sets up bidirectional communication,
/// and manages the connection lifecycle. The socket closing (cleanly
/// or not) produces the implicit disconnect event.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Generate connection ID
    let client_id = ClientId::new();
    info!("Client {} connected from {}", client_id, peer_addr);

    // Create channel for server -> client events
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(32);

    // Register with ChatServer
    if cmd_tx
        .send(ServerCommand::Connect {
            client_id,
            sender: event_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", client_id);
        return Err(AppError::ChannelSend);
    }

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (WebSocket -> ServerCommand)
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            let cmd = client_event_to_command(client_id, event);
                            if cmd_tx_read.send(cmd).await.is_err() {
                                debug!("Server closed, ending read task for {}", client_id);
                                break;
                            }
                        }
                        Err(e) => {
                            // Malformed payloads are dropped, never fatal
                            warn!("Invalid JSON from {}: {}", client_id, e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(Message::Ping(data)) => {
                    debug!("Ping from {}", client_id);
                    // Pong is handled automatically by tungstenite
                    let _ = data;
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", client_id);
                }
                Ok(_) => {
                    // Binary or other message types - ignore
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Spawn write task (ServerEvent -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                    // Continue - don't break on serialization errors
                }
            }
        }
        debug!("Write task ended for client");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", client_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", client_id);
        }
    }

    // Send disconnect command
    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Convert a ClientEvent to a ServerCommand
fn client_event_to_command(client_id: ClientId, event: ClientEvent) -> ServerCommand {
    match event {
        ClientEvent::JoinRoom { username, room } => ServerCommand::Join {
            client_id,
            username,
            room,
        },
        ClientEvent::ChangeRoom { username, room } => ServerCommand::ChangeRoom {
            client_id,
            username,
            room,
        },
        ClientEvent::Chat {
            username,
            room,
            message,
        } => ServerCommand::Chat {
            client_id,
            username,
            room,
            message,
        },
        ClientEvent::Typing {
            username,
            room,
            is_typing,
        } => ServerCommand::Typing {
            client_id,
            username,
            room,
            is_typing,
        },
        ClientEvent::PrivateMessage { to, from, message } => ServerCommand::PrivateMessage {
            client_id,
            to,
            from,
            message,
        },
        ClientEvent::MessageReaction {
            username,
            room,
            emoji,
            message_index,
        } => ServerCommand::MessageReaction {
            client_id,
            username,
            room,
            emoji,
            message_index,
        },
    }
}
