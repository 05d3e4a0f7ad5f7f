//! UseCase 層
//!
//! 同期プロトコルの各イベント（join / leave / updateState / disconnect）
//! と HTTP API の操作を 1 ユースケース 1 モジュールで実装します。
//! ユースケースは Registry・セッションストア・MessagePusher を
//! オーケストレーションし、ソケットには触れません。

pub mod create_session;
pub mod disconnect;
pub mod error;
pub mod get_session;
pub mod join_session;
pub mod leave_session;
pub mod update_state;

pub use create_session::CreateSessionUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{CreateSessionError, GetSessionError, SyncError};
pub use get_session::GetSessionUseCase;
pub use join_session::JoinSessionUseCase;
pub use leave_session::LeaveSessionUseCase;
pub use update_state::{StateBroadcast, UpdateStateUseCase};
