//! UseCase: セッション取得処理

use std::sync::Arc;

use crate::domain::{Session, SessionId, SessionRepository};

use super::error::GetSessionError;

/// セッション取得のユースケース
pub struct GetSessionUseCase {
    /// セッションストア
    sessions: Arc<dyn SessionRepository>,
}

impl GetSessionUseCase {
    /// 新しい GetSessionUseCase を作成
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// セッション取得を実行
    pub async fn execute(&self, session_id: &SessionId) -> Result<Session, GetSessionError> {
        self.sessions
            .get(session_id)
            .await?
            .ok_or(GetSessionError::NotFound)
    }
}
