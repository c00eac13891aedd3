//! Room-management API DTOs.

use serde::{Deserialize, Serialize};

/// Request body for `POST /room/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: String,
    pub expires_in_minutes: u32,
    pub max_users: u32,
}

/// Response body for `POST /room/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: String,
}

/// Request body for `POST /room/join`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub room_id: String,
}

/// Room metadata snapshot from `GET /room/info/{room_id}`.
///
/// The snapshot is immutable; a refresh replaces it wholly. `expires_at` is
/// a Unix timestamp in milliseconds and may be absent for rooms without an
/// expiry. `is_expired` reflects the server's view at fetch time; the client
/// recomputes expiry as wall-clock passes `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub room_id: String,
    pub name: String,
    pub max_users: u32,
    pub expires_at: Option<i64>,
    pub is_expired: bool,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_request_serializes_to_camel_case() {
        // テスト項目: CreateRoomRequest が camelCase の JSON になる
        // given (前提条件):
        let request = CreateRoomRequest {
            room_name: "Standup".to_string(),
            expires_in_minutes: 60,
            max_users: 10,
        };

        // when (操作):
        let json = serde_json::to_string(&request).unwrap();

        // then (期待する結果):
        assert!(json.contains("\"roomName\":\"Standup\""));
        assert!(json.contains("\"expiresInMinutes\":60"));
        assert!(json.contains("\"maxUsers\":10"));
    }

    #[test]
    fn test_room_info_deserializes_without_expiry() {
        // テスト項目: expiresAt が null の RoomInfo が復元される
        // given (前提条件):
        let json = r#"{"roomId":"R1","name":"Standup","maxUsers":10,"expiresAt":null,"isExpired":false}"#;

        // when (操作):
        let info: RoomInfo = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(info.room_id, "R1");
        assert_eq!(info.expires_at, None);
        assert!(!info.is_expired);
    }

    #[test]
    fn test_error_body_tolerates_missing_message() {
        // テスト項目: message フィールドの無いエラーボディが復元される
        // given (前提条件):
        let json = r#"{}"#;

        // when (操作):
        let body: ErrorBody = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(body.message, "");
    }
}
