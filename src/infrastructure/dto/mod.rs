//! Data Transfer Objects (DTOs) for the watch-party server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event DTOs (the synchronization protocol)
//! - `http`: HTTP API request/response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
