//! インメモリ Session Repository 実装
//!
//! セッションストアのインメモリ実装。ID は uuid v4 で発行します。
//! 同期エンジンからは join 時の存在確認に参照され、HTTP API からは
//! セッションの作成・取得に使用されます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::common::time::get_epoch_millis;
use crate::domain::{RepositoryError, Session, SessionId, SessionRepository, Timestamp};

/// インメモリ Session Repository
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(
        &self,
        user_id: String,
        video_url: String,
    ) -> Result<Session, RepositoryError> {
        let id = SessionId::new(Uuid::new_v4().to_string())
            .expect("uuid v4 is always a valid session id");
        let session = Session::new(id.clone(), user_id, video_url, Timestamp::new(get_epoch_millis()));

        let mut sessions = self.sessions.lock().await;
        sessions.insert(id, session.clone());

        Ok(session)
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn exists(&self, session_id: &SessionId) -> Result<bool, RepositoryError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.contains_key(session_id))
    }

    async fn delete(&self, session_id: &SessionId) -> Result<bool, RepositoryError> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(session_id).is_some())
    }
}
