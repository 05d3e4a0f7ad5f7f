//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクトのバリデーションエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("id must not be empty")]
    Empty,
    #[error("id exceeds maximum length of {0} bytes")]
    TooLong(usize),
}

/// セッションストアへのアクセスエラー
///
/// インメモリ実装は失敗しませんが、trait は将来の永続化実装
/// （DBMS など）を想定して fallible にしています。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),
}

/// メッセージ送信（push/broadcast）のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("client '{0}' is already registered")]
    DuplicateClient(String),
    #[error("client '{0}' is not connected")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// 状態更新が Room Registry に拒否された理由
///
/// どちらの場合も Room の状態は一切変更されません。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpdateRejection {
    /// 対象セッションのアクティブな Room が存在しない
    #[error("no active room for session '{0}'")]
    RoomNotFound(String),
    /// 送信者がその Room の参加者ではない
    #[error("client '{client_id}' is not a participant of session '{session_id}'")]
    NotParticipant {
        session_id: String,
        client_id: String,
    },
}
