//! Room-management API client.
//!
//! Thin request/response client over reqwest. At most one request may be in
//! flight per (method, path) key; a duplicate concurrent call is
//! short-circuited to `Ok(None)` without touching the network. Callers must
//! treat `None` as "request was suppressed, not answered".

use std::collections::HashSet;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::infrastructure::dto::http::{
    CreateRoomRequest, CreateRoomResponse, ErrorBody, JoinRoomRequest, RoomInfo,
};

use super::error::ApiError;

/// Tracks in-flight (method, path) request keys.
#[derive(Debug, Default)]
pub struct InFlightSet {
    labels: Mutex<HashSet<String>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `label`, or return `None` when a request with the same label is
    /// already in flight.
    pub fn begin(&self, label: &str) -> Option<InFlightPermit<'_>> {
        let mut labels = self.labels.lock().expect("in-flight lock poisoned");
        if !labels.insert(label.to_string()) {
            return None;
        }
        Some(InFlightPermit {
            set: self,
            label: label.to_string(),
        })
    }
}

/// RAII guard releasing the in-flight key on drop, whether the request
/// succeeded, failed, or panicked.
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    set: &'a InFlightSet,
    label: String,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        if let Ok(mut labels) = self.set.labels.lock() {
            labels.remove(&self.label);
        }
    }
}

/// Client for the room-management API.
pub struct RoomApi {
    base_url: String,
    http: reqwest::Client,
    in_flight: InFlightSet,
}

impl RoomApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
            in_flight: InFlightSet::new(),
        }
    }

    /// `POST /room/create`
    pub async fn create_room(
        &self,
        request: &CreateRoomRequest,
    ) -> Result<Option<CreateRoomResponse>, ApiError> {
        self.post_json("/room/create", request).await
    }

    /// `POST /room/join`
    pub async fn join_room(&self, room_id: &str) -> Result<Option<()>, ApiError> {
        let request = JoinRoomRequest {
            room_id: room_id.to_string(),
        };
        let response: Option<serde_json::Value> = self.post_json("/room/join", &request).await?;
        Ok(response.map(|_| ()))
    }

    /// `GET /room/info/{room_id}`
    pub async fn get_room_info(&self, room_id: &str) -> Result<Option<RoomInfo>, ApiError> {
        self.get_json(&format!("/room/info/{}", room_id)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let label = format!("GET {}", path);
        let Some(_permit) = self.in_flight.begin(&label) else {
            tracing::debug!("Ignoring duplicate request: {}", label);
            return Ok(None);
        };

        tracing::debug!("Request: {}", label);
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::parse_response(response, &label).await.map(Some)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>, ApiError> {
        let label = format!("POST {}", path);
        let Some(_permit) = self.in_flight.begin(&label) else {
            tracing::debug!("Ignoring duplicate request: {}", label);
            return Ok(None);
        };

        tracing::debug!("Request: {}", label);
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::parse_response(response, &label).await.map(Some)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        label: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("Response: {} -> {}", label, status);

        if !status.is_success() {
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.message,
            });
        }

        // Empty 2xx bodies are treated as an empty JSON object so that
        // responses without a payload still deserialize into unit-like types.
        let body = if text.is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Status {
            status: status.as_u16(),
            message: format!("Malformed response body: {}", e),
        })
    }
}
