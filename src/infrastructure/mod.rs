//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装（インメモリの Registry と
//! セッションストア、WebSocket の MessagePusher）と、プロトコル境界の
//! DTO を提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;

pub use message_pusher::WebSocketMessagePusher;
pub use repository::{InMemoryRoomRegistry, InMemorySessionRepository};
