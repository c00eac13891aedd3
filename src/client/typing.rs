//! Outbound typing-signal debouncing.
//!
//! Keystrokes arrive far faster than the transport should hear about them.
//! This small state machine re-emits typing-start at most once per trailing
//! window and auto-emits typing-stop after a quiet gap with no input. Time
//! is passed in explicitly so the transitions are testable without
//! wall-clock delays.

/// Trailing window for start re-emission and quiet gap for auto-stop.
pub const TYPING_QUIET_MILLIS: i64 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypingPhase {
    Idle,
    Active { last_emit: i64, last_input: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingSignal {
    Start,
    Stop,
}

/// Debounced local typing state.
#[derive(Debug)]
pub struct TypingTracker {
    phase: TypingPhase,
    quiet_millis: i64,
}

impl Default for TypingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingTracker {
    pub fn new() -> Self {
        Self {
            phase: TypingPhase::Idle,
            quiet_millis: TYPING_QUIET_MILLIS,
        }
    }

    /// A keystroke happened. Emits `Start` when idle, or when the trailing
    /// window has elapsed since the last emitted start.
    pub fn on_input(&mut self, now: i64) -> Option<TypingSignal> {
        match self.phase {
            TypingPhase::Idle => {
                self.phase = TypingPhase::Active {
                    last_emit: now,
                    last_input: now,
                };
                Some(TypingSignal::Start)
            }
            TypingPhase::Active { last_emit, .. } => {
                if now - last_emit >= self.quiet_millis {
                    self.phase = TypingPhase::Active {
                        last_emit: now,
                        last_input: now,
                    };
                    Some(TypingSignal::Start)
                } else {
                    self.phase = TypingPhase::Active {
                        last_emit,
                        last_input: now,
                    };
                    None
                }
            }
        }
    }

    /// Periodic check. Emits `Stop` once the quiet gap has passed with no
    /// further input.
    pub fn on_tick(&mut self, now: i64) -> Option<TypingSignal> {
        match self.phase {
            TypingPhase::Active { last_input, .. } if now - last_input >= self.quiet_millis => {
                self.phase = TypingPhase::Idle;
                Some(TypingSignal::Stop)
            }
            _ => None,
        }
    }

    /// Forced stop, used when a message is sent or the session tears down.
    pub fn flush(&mut self) -> Option<TypingSignal> {
        match self.phase {
            TypingPhase::Active { .. } => {
                self.phase = TypingPhase::Idle;
                Some(TypingSignal::Stop)
            }
            TypingPhase::Idle => None,
        }
    }
}
