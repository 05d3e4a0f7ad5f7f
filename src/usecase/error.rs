//! UseCase 層のエラー定義
//!
//! 同期プロトコルのエラー分類は 3 種類です：
//! - *not-found*: join 時にセッションが存在しない
//! - *forbidden*: 非参加者からの状態更新
//! - *internal*: Registry・ストア・転送層の予期しない失敗
//!
//! いずれも接続境界で捕捉され、発生元の接続にのみ `error` イベントとして
//! 返されます。他の参加者に影響することはありません。

use thiserror::Error;

use crate::domain::{RepositoryError, UpdateRejection};

/// 同期プロトコルのエラー
///
/// `Display` はそのままクライアントへ返す文言です。内部エラーの詳細は
/// ログにのみ残し、wire には出しません。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Session not found")]
    SessionNotFound { session_id: String },
    #[error("Not a participant of this session")]
    Forbidden {
        session_id: String,
        client_id: String,
    },
    #[error("Internal server error")]
    Internal(String),
}

impl SyncError {
    /// wire 上のエラーコード
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::SessionNotFound { .. } => "SESSION_NOT_FOUND",
            SyncError::Forbidden { .. } => "FORBIDDEN",
            SyncError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// 想定内のユーザ起因の条件かどうか（ログレベルの判定に使用）
    pub fn is_expected(&self) -> bool {
        !matches!(self, SyncError::Internal(_))
    }
}

impl From<UpdateRejection> for SyncError {
    fn from(rejection: UpdateRejection) -> Self {
        match rejection {
            UpdateRejection::RoomNotFound(session_id) => SyncError::SessionNotFound { session_id },
            UpdateRejection::NotParticipant {
                session_id,
                client_id,
            } => SyncError::Forbidden {
                session_id,
                client_id,
            },
        }
    }
}

impl From<RepositoryError> for SyncError {
    fn from(err: RepositoryError) -> Self {
        SyncError::Internal(err.to_string())
    }
}

/// セッション作成のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateSessionError {
    #[error("User ID is required")]
    MissingUserId,
    #[error("Video URL is required")]
    MissingVideoUrl,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// セッション取得のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GetSessionError {
    #[error("Session not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_error_codes() {
        // テスト項目: 各エラーが正しい wire コードを持つ
        // given (前提条件):
        let not_found = SyncError::SessionNotFound {
            session_id: "abc".to_string(),
        };
        let forbidden = SyncError::Forbidden {
            session_id: "abc".to_string(),
            client_id: "x".to_string(),
        };
        let internal = SyncError::Internal("boom".to_string());

        // when (操作) / then (期待する結果):
        assert_eq!(not_found.code(), "SESSION_NOT_FOUND");
        assert_eq!(forbidden.code(), "FORBIDDEN");
        assert_eq!(internal.code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_expected_errors_are_not_internal() {
        // テスト項目: not-found / forbidden は想定内、internal のみ想定外
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert!(
            SyncError::SessionNotFound {
                session_id: "abc".to_string()
            }
            .is_expected()
        );
        assert!(!SyncError::Internal("boom".to_string()).is_expected());
    }

    #[test]
    fn test_update_rejection_maps_to_sync_error() {
        // テスト項目: Registry の拒否理由がプロトコルエラーに対応付けられる
        // given (前提条件):
        let not_found = UpdateRejection::RoomNotFound("abc".to_string());
        let not_participant = UpdateRejection::NotParticipant {
            session_id: "abc".to_string(),
            client_id: "x".to_string(),
        };

        // when (操作):
        let e1: SyncError = not_found.into();
        let e2: SyncError = not_participant.into();

        // then (期待する結果):
        assert_eq!(e1.code(), "SESSION_NOT_FOUND");
        assert_eq!(e2.code(), "FORBIDDEN");
    }

    #[test]
    fn test_internal_error_hides_detail_from_display() {
        // テスト項目: 内部エラーの詳細が Display（wire 文言）に漏れない
        // given (前提条件):
        let err = SyncError::Internal("store exploded at line 42".to_string());

        // when (操作):
        let message = err.to_string();

        // then (期待する結果):
        assert_eq!(message, "Internal server error");
    }
}
