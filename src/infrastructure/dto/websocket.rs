//! WebSocket event DTOs for the synchronization protocol.
//!
//! Every frame is a JSON object tagged by `type` (camelCase). Inbound events
//! come from a participant; outbound events are pushed by the server. Field
//! names follow the wire protocol, not Rust conventions.

use serde::{Deserialize, Serialize};

/// Outbound event discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    StateUpdate,
    ParticipantJoined,
    ParticipantLeft,
    Error,
}

/// Inbound events, tagged by `type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    #[serde(rename_all = "camelCase")]
    JoinSession { session_id: String },
    #[serde(rename_all = "camelCase")]
    LeaveSession { session_id: String },
    #[serde(rename_all = "camelCase")]
    UpdateState {
        session_id: String,
        is_playing: bool,
        current_time: f64,
    },
}

/// Authoritative playback state, sent to a new joiner and broadcast on updates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdateMessage {
    pub r#type: MessageType,
    pub is_playing: bool,
    /// Playback position in seconds, drift-compensated for joiners
    pub current_time: f64,
    /// Server wall-clock time in milliseconds when the state was captured
    pub timestamp: i64,
}

/// Presence event broadcast to the rest of the room on join
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantJoinedMessage {
    pub r#type: MessageType,
    pub participant_id: String,
    pub total_participants: usize,
}

/// Presence event broadcast to the remaining members on leave/disconnect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantLeftMessage {
    pub r#type: MessageType,
    pub participant_id: String,
    pub total_participants: usize,
}

/// Error event, sent to the originating connection only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Error,
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Error for frames that could not be parsed as a protocol event
    pub fn invalid_message() -> Self {
        Self::new("Malformed message", "INVALID_MESSAGE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_join_session_parses() {
        // テスト項目: joinSession イベントがパースできる
        // given (前提条件):
        let json = r#"{"type":"joinSession","sessionId":"abc"}"#;

        // when (操作):
        let msg: InboundMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            InboundMessage::JoinSession {
                session_id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_inbound_update_state_parses() {
        // テスト項目: updateState イベントが camelCase フィールドでパースできる
        // given (前提条件):
        let json = r#"{"type":"updateState","sessionId":"abc","isPlaying":true,"currentTime":12.5}"#;

        // when (操作):
        let msg: InboundMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            InboundMessage::UpdateState {
                session_id: "abc".to_string(),
                is_playing: true,
                current_time: 12.5,
            }
        );
    }

    #[test]
    fn test_inbound_unknown_type_rejected() {
        // テスト項目: 未知の type を持つフレームはパースに失敗する
        // given (前提条件):
        let json = r#"{"type":"chat","content":"hello"}"#;

        // when (操作):
        let result = serde_json::from_str::<InboundMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_state_update_serializes_camel_case() {
        // テスト項目: stateUpdate が camelCase の wire 形式で出力される
        // given (前提条件):
        let msg = StateUpdateMessage {
            r#type: MessageType::StateUpdate,
            is_playing: true,
            current_time: 14.0,
            timestamp: 1_000_000,
        };

        // when (操作):
        let json = serde_json::to_string(&msg).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""type":"stateUpdate""#));
        assert!(json.contains(r#""isPlaying":true"#));
        assert!(json.contains(r#""currentTime":14.0"#));
        assert!(json.contains(r#""timestamp":1000000"#));
    }

    #[test]
    fn test_participant_joined_serializes_camel_case() {
        // テスト項目: participantJoined が camelCase の wire 形式で出力される
        // given (前提条件):
        let msg = ParticipantJoinedMessage {
            r#type: MessageType::ParticipantJoined,
            participant_id: "y".to_string(),
            total_participants: 2,
        };

        // when (操作):
        let json = serde_json::to_string(&msg).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""type":"participantJoined""#));
        assert!(json.contains(r#""participantId":"y""#));
        assert!(json.contains(r#""totalParticipants":2"#));
    }

    #[test]
    fn test_error_message_omits_empty_details() {
        // テスト項目: details が None の場合は JSON に出力されない
        // given (前提条件):
        let msg = ErrorMessage::invalid_message();

        // when (操作):
        let json = serde_json::to_string(&msg).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""type":"error""#));
        assert!(json.contains(r#""code":"INVALID_MESSAGE""#));
        assert!(!json.contains("details"));
    }
}
