//! インメモリ Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! セッション ID から Room へのマップを 1 つの Mutex で保護します。
//!
//! ## 並行性
//!
//! マップ全体を粗い 1 本のロックで保護します。各操作は O(1) の
//! read-modify-write をロック内で完結させるため、同一 Room への並行
//! 操作は自然に直列化されます。ロックを保持したままネットワーク I/O を
//! 行うことはありません（ブロードキャストは呼び出し元がロック解放後に
//! 実行します）。
//!
//! ## ライフサイクル
//!
//! Room は最初の join で遅延生成され、参加者が 0 になった瞬間に
//! マップから削除されます。空の Room が残り続けることはなく、
//! 短命なセッションが大量に発生してもメモリは増え続けません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, Room, RoomJoined, RoomLeft, RoomRegistry, SessionId, Timestamp, UpdateRejection,
};

/// インメモリ Room Registry
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<SessionId, Room>>,
}

impl InMemoryRoomRegistry {
    /// 空の Registry を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(
        &self,
        session_id: &SessionId,
        client_id: ClientId,
        now: Timestamp,
    ) -> RoomJoined {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .entry(session_id.clone())
            .or_insert_with(|| Room::new(session_id.clone(), now));

        let newly_joined = room.add_participant(client_id.clone());
        let others = room
            .participants
            .iter()
            .filter(|id| **id != client_id)
            .cloned()
            .collect();

        RoomJoined {
            is_playing: room.is_playing,
            current_time: room.current_position(now),
            timestamp: now,
            total_participants: room.participant_count(),
            others,
            newly_joined,
        }
    }

    async fn leave(&self, session_id: &SessionId, client_id: &ClientId) -> Option<RoomLeft> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(session_id)?;

        if !room.remove_participant(client_id) {
            return None;
        }

        if room.is_empty() {
            rooms.remove(session_id);
            return Some(RoomLeft {
                remaining: Vec::new(),
                total_participants: 0,
                room_removed: true,
            });
        }

        Some(RoomLeft {
            remaining: room.participants.clone(),
            total_participants: room.participant_count(),
            room_removed: false,
        })
    }

    async fn update_state(
        &self,
        session_id: &SessionId,
        client_id: &ClientId,
        is_playing: bool,
        position: f64,
        now: Timestamp,
    ) -> Result<Vec<ClientId>, UpdateRejection> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(session_id)
            .ok_or_else(|| UpdateRejection::RoomNotFound(session_id.as_str().to_string()))?;

        if !room.has_participant(client_id) {
            return Err(UpdateRejection::NotParticipant {
                session_id: session_id.as_str().to_string(),
                client_id: client_id.as_str().to_string(),
            });
        }

        room.apply_update(is_playing, position, now);

        Ok(room
            .participants
            .iter()
            .filter(|id| *id != client_id)
            .cloned()
            .collect())
    }

    async fn sessions_of(&self, client_id: &ClientId) -> Vec<SessionId> {
        let rooms = self.rooms.lock().await;
        rooms
            .iter()
            .filter(|(_, room)| room.has_participant(client_id))
            .map(|(session_id, _)| session_id.clone())
            .collect()
    }

    async fn get(&self, session_id: &SessionId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(session_id).cloned()
    }

    async fn rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }

    async fn room_count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}
