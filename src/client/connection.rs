//! Connection controller.
//!
//! Owns the session binding for the single live transport connection.
//! Presence is transport-scoped, not binding-scoped: the server forgets room
//! membership when the socket drops, so the join announcement is re-emitted
//! on every connect event, first connect and reconnects alike.

use crate::infrastructure::dto::websocket::ClientEvent;

/// The (room id, username) pair currently associated with the live transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBinding {
    pub room_id: String,
    pub username: String,
}

/// Tracks the session binding and the derived connected state.
#[derive(Debug, Default)]
pub struct ConnectionController {
    binding: Option<SessionBinding>,
    connected: bool,
}

impl ConnectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the desired session binding. Returns the join announcement to
    /// emit immediately when the transport is already connected; otherwise
    /// the announcement is deferred until the next connect event.
    pub fn bind_session(&mut self, room_id: &str, username: &str) -> Option<ClientEvent> {
        self.binding = Some(SessionBinding {
            room_id: room_id.to_string(),
            username: username.to_string(),
        });
        if self.connected {
            self.join_announcement()
        } else {
            None
        }
    }

    /// Erase the binding. The transport stays open; it may be reused by a
    /// future session.
    pub fn clear_session(&mut self) {
        self.binding = None;
    }

    /// Transport connect event (initial connect and every reconnect).
    /// Returns the join announcement when a binding exists.
    pub fn on_connect(&mut self) -> Option<ClientEvent> {
        self.connected = true;
        self.join_announcement()
    }

    /// Transport disconnect event. The binding is kept so that the next
    /// connect can rejoin automatically.
    pub fn on_disconnect(&mut self) {
        self.connected = false;
    }

    /// Force the derived state offline after the transport was explicitly
    /// closed (room expiry).
    pub fn force_offline(&mut self) {
        self.connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn binding(&self) -> Option<&SessionBinding> {
        self.binding.as_ref()
    }

    fn join_announcement(&self) -> Option<ClientEvent> {
        self.binding.as_ref().map(|binding| ClientEvent::JoinRoom {
            room_id: binding.room_id.clone(),
            username: binding.username.clone(),
        })
    }
}
