//! Live transport event DTOs.
//!
//! Every frame on the wire is a JSON object carrying a `type` tag. Inbound
//! and outbound frames are modeled as two tagged unions; the session loop
//! dispatches on a single enum per direction.

use serde::{Deserialize, Serialize};

/// Events emitted by the client over the live transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Announce presence in a room. Re-sent after every reconnect because
    /// server-side membership does not survive a transport drop.
    #[serde(rename = "join-room", rename_all = "camelCase")]
    JoinRoom { room_id: String, username: String },

    /// A chat message. The server attributes the sender and echoes the
    /// authoritative copy back to everyone, including the sender.
    #[serde(rename = "chat-message")]
    ChatMessage { text: String, timestamp: i64 },

    #[serde(rename = "typing-start", rename_all = "camelCase")]
    TypingStart { room_id: String, username: String },

    #[serde(rename = "typing-stop", rename_all = "camelCase")]
    TypingStop { room_id: String, username: String },
}

/// Events delivered by the server over the live transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "chat-message", rename_all = "camelCase")]
    ChatMessage {
        user_id: String,
        username: String,
        text: String,
        timestamp: i64,
    },

    #[serde(rename = "user-joined", rename_all = "camelCase")]
    UserJoined { username: String, active_users: u32 },

    #[serde(rename = "user-left", rename_all = "camelCase")]
    UserLeft { username: String, active_users: u32 },

    #[serde(rename = "typing-start", rename_all = "camelCase")]
    TypingStart { user_id: String, username: String },

    #[serde(rename = "typing-stop", rename_all = "camelCase")]
    TypingStop { user_id: String },

    #[serde(rename = "error")]
    Error { message: String },
}
