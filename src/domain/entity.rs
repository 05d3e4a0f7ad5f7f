//! ドメインエンティティ定義
//!
//! `Room` は 1 つのアクティブな視聴セッションのサーバ側状態
//! （再生フラグ・位置スナップショット・参加者集合）を表します。
//! `Session` は外部のセッションストアが保持する視聴単位です。

use serde::Serialize;

use super::value_object::{ClientId, SessionId, Timestamp};

/// アクティブな視聴セッションごとに 1 つ存在する Room
///
/// ## 不変条件
///
/// `position` は `updated_at` 時点でのみ意味を持ちます。`is_playing` が
/// true の間、現在位置は必ず [`Room::current_position`] で導出し、
/// `position` を直接読んではいけません。サーバは Room ごとのタイマーを
/// 一切持たず、要求された時点で遅延的に「現在」を再計算します。
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    /// 外部セッション ID と同一のキー
    pub session_id: SessionId,
    /// 再生中かどうか（authoritative な再生フラグ）
    pub is_playing: bool,
    /// `updated_at` 時点で有効だった再生位置（秒）
    pub position: f64,
    /// `position` を記録した時刻（ミリ秒）
    pub updated_at: Timestamp,
    /// 現在 join している接続の集合（挿入は冪等）
    pub participants: Vec<ClientId>,
}

impl Room {
    /// 新しい Room を作成（停止状態・位置 0 秒・参加者なし）
    pub fn new(session_id: SessionId, now: Timestamp) -> Self {
        Self {
            session_id,
            is_playing: false,
            position: 0.0,
            updated_at: now,
            participants: Vec::new(),
        }
    }

    /// ドリフト補間による現在の再生位置（秒）
    ///
    /// 停止中はスナップショットをそのまま返します。再生中は最後に記録した
    /// 位置に経過実時間を外挿します。
    pub fn current_position(&self, now: Timestamp) -> f64 {
        if !self.is_playing {
            return self.position;
        }
        self.position + now.elapsed_secs_since(self.updated_at)
    }

    /// 参加者を追加する（既に参加済みの場合は no-op で false を返す）
    pub fn add_participant(&mut self, client_id: ClientId) -> bool {
        if self.participants.contains(&client_id) {
            return false;
        }
        self.participants.push(client_id);
        true
    }

    /// 参加者を削除する（存在しなかった場合は false を返す）
    pub fn remove_participant(&mut self, client_id: &ClientId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|id| id != client_id);
        self.participants.len() != before
    }

    pub fn has_participant(&self, client_id: &ClientId) -> bool {
        self.participants.contains(client_id)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// 再生状態を上書きする（last-writer-wins）
    ///
    /// クライアント申告の時刻による順序判定は行いません。
    pub fn apply_update(&mut self, is_playing: bool, position: f64, now: Timestamp) {
        self.is_playing = is_playing;
        self.position = position;
        self.updated_at = now;
    }
}

/// 外部セッションストアが保持する視聴セッション
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: String,
    pub video_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Session {
    pub fn new(id: SessionId, user_id: String, video_url: String, now: Timestamp) -> Self {
        Self {
            id,
            user_id,
            video_url,
            created_at: now,
            updated_at: now,
        }
    }
}
