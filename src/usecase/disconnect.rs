//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 接続が参加していた全 Room からの暗黙的な退出
//!
//! ### なぜこのテストが必要か
//! - 切断が全 Room に対する leave と同じ効果を持つこと
//! - 退出ごとに 1 回だけ通知対象が返ること
//! - 一度も join していない接続の切断も安全であること（冪等性）
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数 Room に参加していた接続の切断
//! - エッジケース：join 前の切断、最後の参加者の切断

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, RoomLeft, RoomRegistry, SessionId};

/// 切断のユースケース
///
/// disconnect は同期プロトコル唯一のキャンセルシグナルです。
/// 接続が参加していた各 Room について leave と同じ効果を適用し、
/// 最後に MessagePusher から接続を登録解除します。
pub struct DisconnectUseCase {
    /// Room Registry（Room のライフサイクルと状態を所有）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 退出した Room ごとの (セッション ID, 退出結果) のリスト。
    /// どの Room にも参加していなかった場合は空リスト。
    pub async fn execute(&self, client_id: &ClientId) -> Vec<(SessionId, RoomLeft)> {
        let sessions = self.registry.sessions_of(client_id).await;

        let mut departures = Vec::with_capacity(sessions.len());
        for session_id in sessions {
            if let Some(left) = self.registry.leave(&session_id, client_id).await {
                departures.push((session_id, left));
            }
        }

        self.message_pusher.unregister_client(client_id).await;

        departures
    }

    /// 参加者が退出したことを残りの参加者にブロードキャスト
    pub async fn broadcast_participant_left(
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
