//! Message formatting utilities for terminal display.

use crate::common::time::timestamp_to_rfc3339;
use crate::infrastructure::dto::http::RoomInfo;

use super::reconciler::{EntryKind, TimelineEntry};

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one timeline entry. The local user's own messages are marked
    /// "You"; system entries carry the current active-user count.
    pub fn format_entry(entry: &TimelineEntry, local_username: &str, active_users: u32) -> String {
        match entry.kind {
            EntryKind::System => {
                if active_users > 0 {
                    format!("\n* {} ({} active)\n", entry.text, active_users)
                } else {
                    format!("\n* {}\n", entry.text)
                }
            }
            EntryKind::Chat => {
                let who = if entry.username == local_username {
                    "You"
                } else {
                    entry.username.as_str()
                };
                let sent_at = entry
                    .timestamp
                    .map(timestamp_to_rfc3339)
                    .unwrap_or_default();
                format!("\n@{}: {}\nsent at {}\n", who, entry.text, sent_at)
            }
        }
    }

    /// Format the typing indicator line. Empty input yields an empty string;
    /// at most two names are spelled out.
    pub fn format_typing(users: &[String]) -> String {
        match users {
            [] => String::new(),
            [one] => format!("{} is typing...\n", one),
            [first, second] => format!("{}, {} are typing...\n", first, second),
            [first, second, ..] => format!("{}, {} and others are typing...\n", first, second),
        }
    }

    /// Format a connection status change
    pub fn format_status(connected: bool) -> String {
        if connected {
            "\n[connected]\n".to_string()
        } else {
            "\n[disconnected - reconnecting]\n".to_string()
        }
    }

    /// Format the room header shown at session entry
    pub fn format_room_header(info: &RoomInfo) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Room: {} ({})\n", info.name, info.room_id));
        output.push_str(&format!("Max users: {}\n", info.max_users));
        match info.expires_at {
            Some(expires_at) => {
                output.push_str(&format!(
                    "Expires at: {}\n",
                    timestamp_to_rfc3339(expires_at)
                ));
            }
            None => output.push_str("Expires at: (no expiry)\n"),
        }
        output.push_str("============================================================\n");
        output
    }

    /// Format the countdown status line
    pub fn format_countdown(label: &str) -> String {
        format!("\n[expires in {}]\n", label)
    }

    /// Format the terminal room-expired notice. The session is over; the
    /// only way forward is back to the join flow.
    pub fn format_expired_notice() -> String {
        "\n============================================================\n\
         Room expired\n\
         This chat room can no longer accept messages.\n\
         You have been disconnected. Run `client join` to enter\n\
         another room.\n\
         ============================================================\n"
            .to_string()
    }

    /// Format a transient feedback banner
    pub fn format_feedback(message: &str) -> String {
        format!("\n! {}\n", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_entry(username: &str, text: &str, timestamp: i64) -> TimelineEntry {
        TimelineEntry {
            kind: EntryKind::Chat,
            user_id: Some("u1".to_string()),
            username: username.to_string(),
            text: text.to_string(),
            timestamp: Some(timestamp),
        }
    }

    #[test]
    fn test_format_chat_entry_from_remote_user() {
        // テスト項目: 他ユーザーのチャットメッセージが名前付きで表示される
        // given (前提条件):
        let entry = chat_entry("alice", "Hello, world!", 1672531200000);

        // when (操作):
        let result = MessageFormatter::format_entry(&entry, "bob", 2);

        // then (期待する結果):
        assert!(result.contains("@alice: Hello, world!"));
        assert!(result.contains("sent at"));
        assert!(result.contains("2023-01-01"));
    }

    #[test]
    fn test_format_chat_entry_from_local_user_is_marked_you() {
        // テスト項目: 自分のメッセージは "You" と表示される
        // given (前提条件):
        let entry = chat_entry("bob", "hi", 1672531200000);

        // when (操作):
        let result = MessageFormatter::format_entry(&entry, "bob", 2);

        // then (期待する結果):
        assert!(result.contains("@You: hi"));
    }

    #[test]
    fn test_format_system_entry_includes_active_count() {
        // テスト項目: システムエントリに在室人数が付く
        // given (前提条件):
        let entry = TimelineEntry {
            kind: EntryKind::System,
            user_id: None,
            username: "alice".to_string(),
            text: "alice joined".to_string(),
            timestamp: None,
        };

        // when (操作):
        let result = MessageFormatter::format_entry(&entry, "bob", 3);

        // then (期待する結果):
        assert!(result.contains("* alice joined (3 active)"));
    }

    #[test]
    fn test_format_typing_variants() {
        // テスト項目: typing インジケータが人数に応じた形式になる
        // given (前提条件):
        let none: Vec<String> = vec![];
        let one = vec!["alice".to_string()];
        let two = vec!["alice".to_string(), "bob".to_string()];
        let three = vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ];

        // when (操作) / then (期待する結果):
        assert_eq!(MessageFormatter::format_typing(&none), "");
        assert_eq!(MessageFormatter::format_typing(&one), "alice is typing...\n");
        assert_eq!(
            MessageFormatter::format_typing(&two),
            "alice, bob are typing...\n"
        );
        assert_eq!(
            MessageFormatter::format_typing(&three),
            "alice, bob and others are typing...\n"
        );
    }

    #[test]
    fn test_format_room_header_without_expiry() {
        // テスト項目: 期限なしルームのヘッダーに (no expiry) と表示される
        // given (前提条件):
        let info = RoomInfo {
            room_id: "R1".to_string(),
            name: "Standup".to_string(),
            max_users: 10,
            expires_at: None,
            is_expired: false,
        };

        // when (操作):
        let result = MessageFormatter::format_room_header(&info);

        // then (期待する結果):
        assert!(result.contains("Room: Standup (R1)"));
        assert!(result.contains("Max users: 10"));
        assert!(result.contains("(no expiry)"));
    }

    #[test]
    fn test_format_expired_notice_mentions_rejoin() {
        // テスト項目: 期限切れ通知に再入室への導線が含まれる
        // given (前提条件) / when (操作):
        let result = MessageFormatter::format_expired_notice();

        // then (期待する結果):
        assert!(result.contains("Room expired"));
        assert!(result.contains("client join"));
    }
}
