//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/sessions`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub user_id: String,
    pub video_url: String,
}

/// Session representation in HTTP responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub user_id: String,
    pub video_url: String,
    /// RFC 3339 (UTC)
    pub created_at: String,
    pub updated_at: String,
}

/// Success envelope for session endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub session: SessionDto,
}

/// Error envelope for HTTP endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Active room snapshot for the debug endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub session_id: String,
    pub is_playing: bool,
    /// Drift-compensated position at the time of the request
    pub current_time: f64,
    pub participants: Vec<String>,
}
