//! Data Transfer Objects (DTOs) for the chat client.
//!
//! DTOs are organized by protocol:
//! - `websocket`: live transport events (both directions)
//! - `http`: room-management API requests and responses

pub mod http;
pub mod websocket;
