//! ドメイン層
//!
//! 同期エンジンのドメインモデル（エンティティ・値オブジェクト）と、
//! UseCase 層が依存するインターフェース（trait）を定義します。
//! この層は I/O を行いません。

pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use entity::{Room, Session};
pub use error::{MessagePushError, RepositoryError, UpdateRejection, ValidationError};
pub use repository::{
    MessagePusher, PusherChannel, RoomJoined, RoomLeft, RoomRegistry, SessionRepository,
};
pub use value_object::{ClientId, SessionId, Timestamp};

#[cfg(test)]
pub use repository::{MockMessagePusher, MockRoomRegistry, MockSessionRepository};
