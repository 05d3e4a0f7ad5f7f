//! UseCase: セッション退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveSessionUseCase::execute() メソッド
//! - 参加者の退出と空になった Room の破棄
//!
//! ### なぜこのテストが必要か
//! - 最後の参加者の退出で Room が Registry から即座に消えること
//!   （空 Room の滞留によるメモリリークの防止）
//! - 残った参加者への通知対象が正しく選定されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と通知
//! - エッジケース：最後の参加者の退出（通知対象なし・Room 削除）
//! - 異常系：参加していないセッションからの退出（no-op）

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, RoomLeft, RoomRegistry, SessionId};

/// セッション退出のユースケース
pub struct LeaveSessionUseCase {
    /// Room Registry（Room のライフサイクルと状態を所有）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveSessionUseCase {
    /// 新しい LeaveSessionUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// セッション退出を実行
    ///
    /// Room が存在しない、または参加していなかった場合は `None`（no-op）。
    pub async fn execute(&self, session_id: &SessionId, client_id: &ClientId) -> Option<RoomLeft> {
        self.registry.leave(session_id, client_id).await
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
