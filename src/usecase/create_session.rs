//! UseCase: セッション作成処理

use std::sync::Arc;

use crate::domain::{Session, SessionRepository};

use super::error::CreateSessionError;

/// セッション作成のユースケース
pub struct CreateSessionUseCase {
    /// セッションストア
    sessions: Arc<dyn SessionRepository>,
}

impl CreateSessionUseCase {
    /// 新しい CreateSessionUseCase を作成
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// セッション作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 作成されたセッション（ID はストアが発行）
    /// * `Err(CreateSessionError)` - 必須フィールド欠落またはストア障害
    pub async fn execute(
        &self,
        user_id: String,
        video_url: String,
    ) -> Result<Session, CreateSessionError> {
        if user_id.trim().is_empty() {
            return Err(CreateSessionError::MissingUserId);
        }
        if video_url.trim().is_empty() {
            return Err(CreateSessionError::MissingVideoUrl);
        }

        Ok(self.sessions.create(user_id, video_url).await?)
    }
}
