//! UseCase: 再生状態更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateStateUseCase::execute() メソッド
//! - 再生状態の上書き（last-writer-wins）とブロードキャスト対象の選定
//!
//! ### なぜこのテストが必要か
//! - 非参加者からの更新を forbidden で拒否し、Room を変更しないこと
//! - 送信者自身が通知対象に含まれないこと
//! - サーバ時刻（クライアント申告時刻ではない）でスナップショットが
//!   記録されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者からの更新と他参加者への通知
//! - 異常系：Room が存在しない（not-found）、非参加者（forbidden）

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{ClientId, MessagePusher, RoomRegistry, SessionId, Timestamp};

use super::error::SyncError;

/// 状態更新の確定結果とブロードキャストに必要な情報
#[derive(Debug, Clone, PartialEq)]
pub struct StateBroadcast {
    /// 送信者を除く通知対象
    pub targets: Vec<ClientId>,
    pub is_playing: bool,
    pub current_time: f64,
    /// スナップショットを記録したサーバ時刻（ミリ秒）
    pub timestamp: i64,
}

/// 再生状態更新のユースケース
pub struct UpdateStateUseCase {
    /// Room Registry（Room のライフサイクルと状態を所有）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（スナップショット時刻の基準）
    clock: Arc<dyn Clock>,
}

impl UpdateStateUseCase {
    /// 新しい UpdateStateUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            clock,
        }
    }

    /// 再生状態更新を実行
    ///
    /// 状態の上書きは Registry 内で原子的に確定し、その後の
    /// ブロードキャストは確定した状態に影響しません。
    pub async fn execute(
        &self,
        session_id: &SessionId,
        client_id: &ClientId,
        is_playing: bool,
        current_time: f64,
    ) -> Result<StateBroadcast, SyncError> {
        let now = Timestamp::new(self.clock.now_millis());

        let targets = self
            .registry
            .update_state(session_id, client_id, is_playing, current_time, now)
            .await?;

        Ok(StateBroadcast {
            targets,
            is_playing,
            current_time,
            timestamp: now.value(),
        })
    }

    /// 確定した状態を送信者以外の参加者にブロードキャスト
    pub async fn broadcast_state_update(
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
