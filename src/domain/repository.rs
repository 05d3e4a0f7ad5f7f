//! Repository / Registry / MessagePusher trait 定義
//!
//! ドメイン層が必要とするデータアクセスと通知のインターフェースを
//! 定義します。具体的な実装は Infrastructure 層が提供します
//! （依存性の逆転）。

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

use super::{
    entity::{Room, Session},
    error::{MessagePushError, RepositoryError, UpdateRejection},
    value_object::{ClientId, SessionId, Timestamp},
};

/// クライアントへメッセージを届けるためのチャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Room への join が確定した直後のスナップショット
///
/// `current_time` は join 時点でドリフト補間済みの再生位置です。
#[derive(Debug, Clone, PartialEq)]
pub struct RoomJoined {
    pub is_playing: bool,
    pub current_time: f64,
    /// スナップショットを取った時刻（ミリ秒）
    pub timestamp: Timestamp,
    /// join 後の参加者総数（join した本人を含む）
    pub total_participants: usize,
    /// join した本人を除く通知対象
    pub others: Vec<ClientId>,
    /// 既に参加済みだった場合は false（参加者集合への挿入は冪等）
    pub newly_joined: bool,
}

/// Room からの leave が確定した直後のスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLeft {
    /// まだ Room に残っている参加者（通知対象）
    pub remaining: Vec<ClientId>,
    /// leave 後の参加者総数
    pub total_participants: usize,
    /// 最後の参加者だったため Room 自体が削除された場合 true
    pub room_removed: bool,
}

/// Room Registry trait
///
/// プロセス全体で 1 つ存在する、セッション ID から Room 状態への
/// マッピング。Room のライフサイクル（最初の join で遅延生成、最後の
/// leave で即座に削除）は Registry 内部で管理されます。
///
/// 各操作は Room に対する read-modify-write を 1 回の呼び出しに閉じた
/// アトミックな操作です。同一 Room を対象とする並行操作が
/// インターリーブしないことは実装側が保証します。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Room を取得または作成し、参加者を追加する（冪等）
    async fn join(&self, session_id: &SessionId, client_id: ClientId, now: Timestamp)
    -> RoomJoined;

    /// 参加者を削除し、空になった Room を破棄する
    ///
    /// Room が存在しない、または参加者でなかった場合は `None`（no-op）。
    async fn leave(&self, session_id: &SessionId, client_id: &ClientId) -> Option<RoomLeft>;

    /// 再生状態を上書きする（last-writer-wins）
    ///
    /// 成功時は送信者を除く通知対象を返します。拒否時は Room を
    /// 一切変更しません。
    async fn update_state(
        &self,
        session_id: &SessionId,
        client_id: &ClientId,
        is_playing: bool,
        position: f64,
        now: Timestamp,
    ) -> Result<Vec<ClientId>, UpdateRejection>;

    /// 指定した接続が参加している全セッション ID を取得（disconnect 用）
    async fn sessions_of(&self, client_id: &ClientId) -> Vec<SessionId>;

    /// Room のスナップショットを取得（非生成）
    async fn get(&self, session_id: &SessionId) -> Option<Room>;

    /// 全 Room のスナップショットを取得（デバッグ用）
    async fn rooms(&self) -> Vec<Room>;

    /// アクティブな Room 数
    async fn room_count(&self) -> usize;
}

/// Session Repository trait
///
/// 外部のセッションストア（セッション ID・動画 URL・作成時刻の永続化）
/// へのインターフェース。同期エンジンからは join 時の存在確認に
/// 1 回だけ参照されます。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを作成する（ID はストアが発行）
    async fn create(&self, user_id: String, video_url: String)
    -> Result<Session, RepositoryError>;

    /// セッションを取得する
    async fn get(&self, session_id: &SessionId) -> Result<Option<Session>, RepositoryError>;

    /// セッションが存在するかを確認する
    async fn exists(&self, session_id: &SessionId) -> Result<bool, RepositoryError>;

    /// セッションを削除する
    async fn delete(&self, session_id: &SessionId) -> Result<bool, RepositoryError>;
}

/// MessagePusher trait
///
/// 接続中のクライアントへイベントを届ける通知のインターフェース。
/// broadcast は fire-and-forget であり、一部クライアントへの送信失敗が
/// 他の配送や呼び出し元の状態変更を妨げることはありません。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録する（同じ ID の二重登録はエラー）
    async fn register_client(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError>;

    /// クライアントの登録を解除する
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントに送信する
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信する（個別の失敗は許容）
    async fn broadcast(&self, targets: Vec<ClientId>, content: &str)
    -> Result<(), MessagePushError>;
}
