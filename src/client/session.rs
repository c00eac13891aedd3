//! Room session state.
//!
//! `RoomSession` is the single state value behind one room-view session. It
//! composes the connection controller, the room lifecycle, the message
//! reconciler and the typing tracker, and turns inputs (transport events,
//! ticks, user input) into effects for the runner to execute. It performs no
//! I/O itself and takes the current time as an argument, so every state
//! transition is testable synchronously.

use crate::infrastructure::dto::http::RoomInfo;
use crate::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use super::connection::ConnectionController;
use super::lifecycle::RoomLifecycle;
use super::reconciler::{MessageReconciler, TimelineEntry};
use super::transport::TransportEvent;
use super::typing::{TypingSignal, TypingTracker};

/// Side effects requested by the session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Emit an event on the live transport.
    Send(ClientEvent),
    /// Explicitly close the transport (room expiry).
    CloseTransport,
}

/// State of one logical chat session (room + identity).
pub struct RoomSession {
    room_id: String,
    username: String,
    controller: ConnectionController,
    lifecycle: RoomLifecycle,
    reconciler: MessageReconciler,
    typing: TypingTracker,
    room_info: Option<RoomInfo>,
    feedback: Option<String>,
}

impl RoomSession {
    pub fn new(room_id: &str, username: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            username: username.to_string(),
            controller: ConnectionController::new(),
            lifecycle: RoomLifecycle::new(),
            reconciler: MessageReconciler::new(),
            typing: TypingTracker::new(),
            room_info: None,
            feedback: None,
        }
    }

    /// Apply the fetched room snapshot. The snapshot is replaced wholly,
    /// never patched. May expire the session on the spot.
    pub fn hydrate(&mut self, info: RoomInfo, now: i64) -> Vec<SessionEffect> {
        let newly_expired = self.lifecycle.hydrate(&info, now);
        self.room_info = Some(info);
        if newly_expired { self.expire() } else { Vec::new() }
    }

    /// Associate this session with the transport. Must happen before any
    /// join announcement goes out.
    pub fn bind(&mut self) -> Vec<SessionEffect> {
        self.controller
            .bind_session(&self.room_id, &self.username)
            .map(SessionEffect::Send)
            .into_iter()
            .collect()
    }

    pub fn handle_transport_event(&mut self, event: TransportEvent) -> Vec<SessionEffect> {
        // Expired is terminal; whatever still trickles in is ignored.
        if self.is_expired() {
            return Vec::new();
        }
        match event {
            TransportEvent::Connected => self
                .controller
                .on_connect()
                .map(SessionEffect::Send)
                .into_iter()
                .collect(),
            TransportEvent::Disconnected => {
                self.controller.on_disconnect();
                Vec::new()
            }
            TransportEvent::Event(ServerEvent::Error { message }) => {
                self.feedback = Some(message);
                Vec::new()
            }
            TransportEvent::Event(event) => {
                self.reconciler.apply(event);
                Vec::new()
            }
        }
    }

    /// Send a chat message. The message is not appended locally; the
    /// authoritative entry arrives back as self-echo and the reconciler's
    /// dedup keeps a replayed echo from appearing twice.
    pub fn handle_input(&mut self, text: &str, now: i64) -> Vec<SessionEffect> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if !self.is_composer_enabled() {
            self.feedback = Some("Not connected. Message not sent.".to_string());
            return Vec::new();
        }

        let mut effects = vec![SessionEffect::Send(ClientEvent::ChatMessage {
            text: text.to_string(),
            timestamp: now,
        })];
        if let Some(TypingSignal::Stop) = self.typing.flush() {
            effects.push(SessionEffect::Send(self.typing_stop_event()));
        }
        effects
    }

    /// A keystroke in the composer.
    pub fn handle_typing_input(&mut self, now: i64) -> Vec<SessionEffect> {
        if !self.is_composer_enabled() {
            return Vec::new();
        }
        match self.typing.on_input(now) {
            Some(TypingSignal::Start) => {
                vec![SessionEffect::Send(ClientEvent::TypingStart {
                    room_id: self.room_id.clone(),
                    username: self.username.clone(),
                })]
            }
            _ => Vec::new(),
        }
    }

    pub fn on_typing_tick(&mut self, now: i64) -> Vec<SessionEffect> {
        match self.typing.on_tick(now) {
            Some(TypingSignal::Stop) => vec![SessionEffect::Send(self.typing_stop_event())],
            _ => Vec::new(),
        }
    }

    /// Countdown tick at 1 s cadence.
    pub fn on_countdown_tick(&mut self, now: i64) -> Vec<SessionEffect> {
        if self.lifecycle.tick(now) {
            self.expire()
        } else {
            Vec::new()
        }
    }

    /// Session teardown on navigation away. The binding goes; the transport
    /// outlives the session and is closed by its owner.
    pub fn teardown(&mut self) {
        self.controller.clear_session();
    }

    // Entering Expired severs the connection for good: the transport is
    // explicitly closed, connected is forced false and the binding is
    // cleared so no later connect can rejoin.
    fn expire(&mut self) -> Vec<SessionEffect> {
        self.controller.clear_session();
        self.controller.force_offline();
        self.typing.flush();
        vec![SessionEffect::CloseTransport]
    }

    fn typing_stop_event(&self) -> ClientEvent {
        ClientEvent::TypingStop {
            room_id: self.room_id.clone(),
            username: self.username.clone(),
        }
    }

    // --- view-facing state ---

    pub fn is_connected(&self) -> bool {
        self.controller.is_connected()
    }

    pub fn is_expired(&self) -> bool {
        self.lifecycle.is_expired()
    }

    pub fn is_composer_enabled(&self) -> bool {
        self.controller.is_connected() && !self.is_expired()
    }

    pub fn countdown_label(&self, now: i64) -> Option<String> {
        self.lifecycle.countdown_label(now)
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        self.reconciler.timeline()
    }

    pub fn typing_usernames(&self) -> Vec<String> {
        self.reconciler.typing_usernames(&self.username)
    }

    pub fn active_users(&self) -> u32 {
        self.reconciler.active_users()
    }

    pub fn room_info(&self) -> Option<&RoomInfo> {
        self.room_info.as_ref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Take the pending feedback banner, if any.
    pub fn take_feedback(&mut self) -> Option<String> {
        self.feedback.take()
    }
}
