//! UseCase: セッション参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute() メソッド
//! - セッション存在確認と Room への参加（遅延生成・冪等な追加）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：存在しないセッションへの join を拒否し、
//!   その際 Registry を一切変更しないこと
//! - 遅れて join した参加者がドリフト補間済みの位置を受け取ること
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規 Room への join、既存 Room への join
//! - 異常系：未知のセッションへの join（not-found）
//! - エッジケース：再生中の Room への遅延 join

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    ClientId, MessagePusher, RoomJoined, RoomRegistry, SessionId, SessionRepository, Timestamp,
};

use super::error::SyncError;

/// セッション参加のユースケース
pub struct JoinSessionUseCase {
    /// セッションストア（join 時の存在確認に 1 回だけ参照）
    sessions: Arc<dyn SessionRepository>,
    /// Room Registry（Room のライフサイクルと状態を所有）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（ドリフト補間の基準時刻）
    clock: Arc<dyn Clock>,
}

impl JoinSessionUseCase {
    /// 新しい JoinSessionUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            registry,
            message_pusher,
            clock,
        }
    }

    /// セッション参加を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 参加するセッションの ID
    /// * `client_id` - 参加する接続の ID
    ///
    /// # Returns
    ///
    /// * `Ok(RoomJoined)` - 参加成功（補間済みスナップショットと通知対象）
    /// * `Err(SyncError)` - セッションが存在しない、またはストア障害
    pub async fn execute(
        &self,
        session_id: &SessionId,
        client_id: ClientId,
    ) -> Result<RoomJoined, SyncError> {
        // 1. 外部セッションストアで存在確認（Registry は変更しない）
        let exists = self.sessions.exists(session_id).await?;
        if !exists {
            return Err(SyncError::SessionNotFound {
                session_id: session_id.as_str().to_string(),
            });
        }

        // 2. Room へ参加（get-or-create、参加者追加、スナップショット取得まで原子的）
        let now = Timestamp::new(self.clock.now_millis());
        Ok(self.registry.join(session_id, client_id, now).await)
    }

    /// 参加した本人にのみ現在の再生状態を送信
    pub async fn push_state_to_joiner(
        &self,
        client_id: &ClientId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .push_to(client_id, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 参加者が join したことを Room の他の参加者にブロードキャスト
    pub async fn broadcast_participant_joined(
        &self,
        target_ids: Vec<ClientId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(target_ids, message)
            .await
            .map_err(|e| e.to_string())
    }
}
