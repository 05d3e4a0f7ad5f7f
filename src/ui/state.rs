//! Server state and connection management.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomRegistry};
use crate::usecase::{
    CreateSessionUseCase, DisconnectUseCase, GetSessionUseCase, JoinSessionUseCase,
    LeaveSessionUseCase, UpdateStateUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinSessionUseCase（セッション参加のユースケース）
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    /// LeaveSessionUseCase（セッション退出のユースケース）
    pub leave_session_usecase: Arc<LeaveSessionUseCase>,
    /// UpdateStateUseCase（再生状態更新のユースケース）
    pub update_state_usecase: Arc<UpdateStateUseCase>,
    /// DisconnectUseCase（切断のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// CreateSessionUseCase（セッション作成のユースケース）
    pub create_session_usecase: Arc<CreateSessionUseCase>,
    /// GetSessionUseCase（セッション取得のユースケース）
    pub get_session_usecase: Arc<GetSessionUseCase>,
    /// MessagePusher（接続の登録・エラーイベントの送信に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// RoomRegistry（デバッグエンドポイントのスナップショット取得に使用）
    pub registry: Arc<dyn RoomRegistry>,
}
