//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Room could not be entered (lookup or join failed)
    #[error("{0}")]
    Room(String),

    /// Neither the command line nor the stored identity provides a value
    #[error("Missing {0}; pass it explicitly or join a room first")]
    MissingIdentity(&'static str),
}

/// Room-management API errors.
///
/// Request failures are never propagated past the initiating action; the
/// caller maps them to a short user-facing reason string with
/// [`ApiError::join_reason`] or [`ApiError::create_reason`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, refused connection, timeout)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the API
    #[error("API responded with status {status}: {message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    /// User-facing reason for a failed join.
    pub fn join_reason(&self) -> String {
        let reason = match self {
            ApiError::Status { status: 400, .. } => "Check the room code.",
            ApiError::Status { status: 404, .. } => "Room not found.",
            ApiError::Status { status: 410, .. } => "Room expired.",
            ApiError::Status { status: 429, .. } => "Room is full.",
            _ => "Unable to join room.",
        };
        self.with_detail(reason)
    }

    /// User-facing reason for a failed room creation.
    pub fn create_reason(&self) -> String {
        let reason = match self {
            ApiError::Status { status: 400, .. } => "Invalid room data.",
            ApiError::Status { status: 429, .. } => "Room limit reached.",
            _ => "Unable to create room.",
        };
        self.with_detail(reason)
    }

    /// User-facing reason for a failed room lookup.
    pub fn lookup_reason(&self) -> String {
        let reason = match self {
            ApiError::Status { status: 404, .. } => "Room not found.",
            ApiError::Status { status: 410, .. } => "Room expired.",
            _ => "Room lookup failed.",
        };
        self.with_detail(reason)
    }

    fn with_detail(&self, reason: &str) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => {
                format!("{reason} {message}")
            }
            _ => reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_reason_maps_status_codes() {
        // テスト項目: join 失敗時のステータスコードが理由文字列に変換される
        // given (前提条件):
        let cases = [
            (400, "Check the room code."),
            (404, "Room not found."),
            (410, "Room expired."),
            (429, "Room is full."),
            (500, "Unable to join room."),
        ];

        for (status, expected) in cases {
            // when (操作):
            let error = ApiError::Status {
                status,
                message: String::new(),
            };

            // then (期待する結果):
            assert_eq!(error.join_reason(), expected);
        }
    }

    #[test]
    fn test_join_reason_appends_server_message() {
        // テスト項目: サーバーの message フィールドが理由に付加される
        // given (前提条件):
        let error = ApiError::Status {
            status: 404,
            message: "no such room".to_string(),
        };

        // when (操作):
        let reason = error.join_reason();

        // then (期待する結果):
        assert_eq!(reason, "Room not found. no such room");
    }

    #[test]
    fn test_create_reason_maps_status_codes() {
        // テスト項目: create 失敗時のステータスコードが理由文字列に変換される
        // given (前提条件):
        let invalid = ApiError::Status {
            status: 400,
            message: String::new(),
        };
        let limit = ApiError::Status {
            status: 429,
            message: String::new(),
        };

        // when (操作) / then (期待する結果):
        assert_eq!(invalid.create_reason(), "Invalid room data.");
        assert_eq!(limit.create_reason(), "Room limit reached.");
    }
}
