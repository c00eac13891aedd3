//! Room lifecycle tracking.
//!
//! Derives the countdown label and the terminal expired state from the room
//! snapshot's `expires_at`. Expiry is recomputed client-side as wall-clock
//! passes the deadline; the transition fires exactly once and there is no
//! way back to Active for the rest of the session.

use crate::infrastructure::dto::http::RoomInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Active,
    Expired,
}

/// Countdown and expiry state machine for one room-view session.
#[derive(Debug)]
pub struct RoomLifecycle {
    expires_at: Option<i64>,
    phase: RoomPhase,
}

impl Default for RoomLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomLifecycle {
    pub fn new() -> Self {
        Self {
            expires_at: None,
            phase: RoomPhase::Active,
        }
    }

    /// Apply a freshly fetched room snapshot. Returns `true` when this call
    /// transitions the room to Expired (snapshot already expired, or the
    /// deadline already passed). Once Expired, later snapshots are ignored;
    /// the state is terminal even if a re-fetch claims the room is active.
    pub fn hydrate(&mut self, info: &RoomInfo, now: i64) -> bool {
        if self.phase == RoomPhase::Expired {
            return false;
        }
        self.expires_at = info.expires_at;
        if info.is_expired {
            self.phase = RoomPhase::Expired;
            return true;
        }
        self.tick(now)
    }

    /// Recompute remaining time. Returns `true` exactly once, the instant
    /// remaining time reaches zero.
    pub fn tick(&mut self, now: i64) -> bool {
        if self.phase == RoomPhase::Expired {
            return false;
        }
        match self.expires_at {
            Some(expires_at) if now >= expires_at => {
                self.phase = RoomPhase::Expired;
                true
            }
            _ => false,
        }
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn is_expired(&self) -> bool {
        self.phase == RoomPhase::Expired
    }

    /// Human countdown as `mm:ss` (floor of seconds, never negative), or
    /// `None` when the room has no expiry to track.
    pub fn countdown_label(&self, now: i64) -> Option<String> {
        let expires_at = self.expires_at?;
        let remaining_millis = (expires_at - now).max(0);
        let total_seconds = remaining_millis / 1000;
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        Some(format!("{:02}:{:02}", minutes, seconds))
    }
}
