//! インメモリ実装
//!
//! HashMap をインメモリ DB として使用します。

pub mod registry;
pub mod session;

pub use registry::InMemoryRoomRegistry;
pub use session::InMemorySessionRepository;
