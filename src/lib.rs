//! Watch-party synchronization server library.
//!
//! This library keeps every participant of a viewing session in lock-step:
//! play/pause/seek actions from one client are rebroadcast to the rest of the
//! room over WebSocket, and late joiners receive a drift-compensated snapshot
//! of the current playback position.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
