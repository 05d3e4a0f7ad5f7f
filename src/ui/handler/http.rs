//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    common::time::get_epoch_millis,
    domain::{RoomRegistry, SessionId, Timestamp},
    infrastructure::dto::http::{ErrorResponse, RoomSummaryDto, SessionResponse},
    ui::state::AppState,
    usecase::{CreateSessionError, GetSessionError},
};

use crate::infrastructure::dto::http::CreateSessionRequest;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a viewing session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .create_session_usecase
        .execute(req.user_id, req.video_url)
        .await
    {
        Ok(session) => Ok(Json(SessionResponse {
            success: true,
            session: session.into(),
        })),
        Err(e @ (CreateSessionError::MissingUserId | CreateSessionError::MissingVideoUrl)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string())),
        )),
        Err(CreateSessionError::Repository(e)) => {
            tracing::error!("Failed to create session: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            ))
        }
    }
}

/// Get session detail by ID
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = SessionId::try_from(session_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Session ID is required")),
        )
    })?;

    match state.get_session_usecase.execute(&session_id).await {
        Ok(session) => Ok(Json(SessionResponse {
            success: true,
            session: session.into(),
        })),
        Err(GetSessionError::NotFound) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Session not found")),
        )),
        Err(GetSessionError::Repository(e)) => {
            tracing::error!("Failed to get session '{}': {}", session_id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            ))
        }
    }
}

/// Debug endpoint to inspect active rooms (for testing purposes)
pub async fn debug_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let now = Timestamp::new(get_epoch_millis());
    let rooms = state.registry.rooms().await;

    Json(
        rooms
            .iter()
            .map(|room| RoomSummaryDto::from_room(room, now))
            .collect(),
    )
}
