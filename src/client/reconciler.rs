//! Message reconciliation.
//!
//! Maintains the ordered message timeline and the typing-presence map from
//! inbound transport events. The timeline is insertion-ordered (arrival
//! order, not timestamp order). Chat events are deduplicated on the
//! (user id, text, timestamp) triple, which is what keeps the self-echo of a
//! sent message and at-least-once redelivery from producing double entries.

use std::collections::HashMap;

use crate::infrastructure::dto::websocket::ServerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Chat,
    System,
}

/// One entry of the room timeline.
///
/// Chat entries carry the sender's id and timestamp; system entries are
/// synthesized locally from presence events and carry neither.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub kind: EntryKind,
    pub user_id: Option<String>,
    pub username: String,
    pub text: String,
    pub timestamp: Option<i64>,
}

impl TimelineEntry {
    fn chat(user_id: String, username: String, text: String, timestamp: i64) -> Self {
        Self {
            kind: EntryKind::Chat,
            user_id: Some(user_id),
            username,
            text,
            timestamp: Some(timestamp),
        }
    }

    fn system(username: String, text: String) -> Self {
        Self {
            kind: EntryKind::System,
            user_id: None,
            username,
            text,
            timestamp: None,
        }
    }
}

/// Reconciles inbound events into one timeline plus typing presence.
#[derive(Debug, Default)]
pub struct MessageReconciler {
    timeline: Vec<TimelineEntry>,
    typing: HashMap<String, String>,
    active_users: u32,
}

impl MessageReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an inbound event. Returns the timeline entry it appended, or
    /// `None` when the event was deduplicated or only mutated typing state.
    pub fn apply(&mut self, event: ServerEvent) -> Option<TimelineEntry> {
        match event {
            ServerEvent::ChatMessage {
                user_id,
                username,
                text,
                timestamp,
            } => {
                if self.is_duplicate(&user_id, &text, timestamp) {
                    tracing::debug!("Dropping duplicate chat event from '{}'", username);
                    return None;
                }
                let entry = TimelineEntry::chat(user_id, username, text, timestamp);
                self.timeline.push(entry.clone());
                Some(entry)
            }
            ServerEvent::UserJoined {
                username,
                active_users,
            } => {
                self.active_users = active_users;
                let entry = TimelineEntry::system(username.clone(), format!("{} joined", username));
                self.timeline.push(entry.clone());
                Some(entry)
            }
            ServerEvent::UserLeft {
                username,
                active_users,
            } => {
                self.active_users = active_users;
                let entry = TimelineEntry::system(username.clone(), format!("{} left", username));
                self.timeline.push(entry.clone());
                Some(entry)
            }
            ServerEvent::TypingStart { user_id, username } => {
                self.typing.insert(user_id, username);
                None
            }
            ServerEvent::TypingStop { user_id } => {
                self.typing.remove(&user_id);
                None
            }
            // Routed to the feedback banner by the session, not the timeline.
            ServerEvent::Error { .. } => None,
        }
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    /// Usernames currently typing, excluding the local user. Sorted for a
    /// stable indicator line.
    pub fn typing_usernames(&self, local_username: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .typing
            .values()
            .filter(|name| name.as_str() != local_username)
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn active_users(&self) -> u32 {
        self.active_users
    }

    fn is_duplicate(&self, user_id: &str, text: &str, timestamp: i64) -> bool {
        self.timeline.iter().any(|entry| {
            entry.kind == EntryKind::Chat
                && entry.user_id.as_deref() == Some(user_id)
                && entry.text == text
                && entry.timestamp == Some(timestamp)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_event(user_id: &str, username: &str, text: &str, timestamp: i64) -> ServerEvent {
        ServerEvent::ChatMessage {
            user_id: user_id.to_string(),
            username: username.to_string(),
            text: text.to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_duplicate_chat_event_yields_one_entry() {
        // テスト項目: 同一 (userId, text, timestamp) のイベントは 1 件に重複排除される
        // given (前提条件):
        let mut reconciler = MessageReconciler::new();

        // when (操作):
        let first = reconciler.apply(chat_event("u1", "bob", "hello", 1000));
        let second = reconciler.apply(chat_event("u1", "bob", "hello", 1000));

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(reconciler.timeline().len(), 1);
    }

    #[test]
    fn test_same_text_with_different_timestamp_is_not_deduplicated() {
        // テスト項目: timestamp が異なる同文メッセージは別エントリになる
        // given (前提条件):
        let mut reconciler = MessageReconciler::new();

        // when (操作):
        reconciler.apply(chat_event("u1", "bob", "hello", 1000));
        reconciler.apply(chat_event("u1", "bob", "hello", 2000));

        // then (期待する結果):
        assert_eq!(reconciler.timeline().len(), 2);
    }

    #[test]
    fn test_timeline_preserves_arrival_order_not_timestamp_order() {
        // テスト項目: タイムラインは timestamp ではなく到着順を保持する
        // given (前提条件):
        let mut reconciler = MessageReconciler::new();

        // when (操作):
        reconciler.apply(chat_event("u1", "bob", "late", 5000));
        reconciler.apply(chat_event("u2", "alice", "early", 1000));

        // then (期待する結果):
        let texts: Vec<&str> = reconciler
            .timeline()
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, vec!["late", "early"]);
    }

    #[test]
    fn test_system_entries_are_synthesized_and_never_deduplicated() {
        // テスト項目: 入退室イベントは毎回追加され、重複排除されない
        // given (前提条件):
        let mut reconciler = MessageReconciler::new();
        let joined = ServerEvent::UserJoined {
            username: "bob".to_string(),
            active_users: 2,
        };

        // when (操作):
        reconciler.apply(joined.clone());
        reconciler.apply(joined);
        reconciler.apply(ServerEvent::UserLeft {
            username: "bob".to_string(),
            active_users: 1,
        });

        // then (期待する結果):
        let texts: Vec<&str> = reconciler
            .timeline()
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, vec!["bob joined", "bob joined", "bob left"]);
        assert!(
            reconciler
                .timeline()
                .iter()
                .all(|e| e.kind == EntryKind::System)
        );
        assert_eq!(reconciler.active_users(), 1);
    }

    #[test]
    fn test_typing_set_never_contains_local_user() {
        // テスト項目: 表示用 typing リストに自分自身が含まれない
        // given (前提条件):
        let mut reconciler = MessageReconciler::new();

        // when (操作):
        reconciler.apply(ServerEvent::TypingStart {
            user_id: "u1".to_string(),
            username: "alice".to_string(),
        });
        reconciler.apply(ServerEvent::TypingStart {
            user_id: "u2".to_string(),
            username: "bob".to_string(),
        });

        // then (期待する結果):
        assert_eq!(reconciler.typing_usernames("bob"), vec!["alice"]);
        assert_eq!(reconciler.typing_usernames("carol"), vec!["alice", "bob"]);
    }

    #[test]
    fn test_typing_stop_removes_entry() {
        // テスト項目: typing-stop で該当ユーザーがリストから消える
        // given (前提条件):
        let mut reconciler = MessageReconciler::new();
        reconciler.apply(ServerEvent::TypingStart {
            user_id: "u1".to_string(),
            username: "alice".to_string(),
        });

        // when (操作):
        reconciler.apply(ServerEvent::TypingStop {
            user_id: "u1".to_string(),
        });

        // then (期待する結果):
        assert!(reconciler.typing_usernames("bob").is_empty());
    }

    #[test]
    fn test_error_event_does_not_touch_timeline() {
        // テスト項目: error イベントはタイムラインに追加されない
        // given (前提条件):
        let mut reconciler = MessageReconciler::new();

        // when (操作):
        let appended = reconciler.apply(ServerEvent::Error {
            message: "room closed".to_string(),
        });

        // then (期待する結果):
        assert!(appended.is_none());
        assert!(reconciler.timeline().is_empty());
    }
}
