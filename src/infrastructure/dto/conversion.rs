//! Conversion logic between DTOs and domain entities.

use crate::common::time::timestamp_to_rfc3339;
use crate::domain::{Room, Session, Timestamp};
use crate::infrastructure::dto::http::{RoomSummaryDto, SessionDto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            id: session.id.into_string(),
            user_id: session.user_id,
            video_url: session.video_url,
            created_at: timestamp_to_rfc3339(session.created_at.value()),
            updated_at: timestamp_to_rfc3339(session.updated_at.value()),
        }
    }
}

impl RoomSummaryDto {
    /// Snapshot a room at `now`, interpolating the playback position
    pub fn from_room(room: &Room, now: Timestamp) -> Self {
        Self {
            session_id: room.session_id.as_str().to_string(),
            is_playing: room.is_playing,
            current_time: room.current_position(now),
            participants: room
                .participants
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
        }
    }
}
