//! Watch-party synchronization server.
//!
//! Keeps every participant of a viewing session on the same playback state:
//! join/leave presence, play/pause/seek propagation, and drift-compensated
//! state snapshots for late joiners.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use watch_party_rs::{
    common::{logger::setup_logger, time::SystemClock},
    infrastructure::{InMemoryRoomRegistry, InMemorySessionRepository, WebSocketMessagePusher},
    ui::{Server, state::AppState},
    usecase::{
        CreateSessionUseCase, DisconnectUseCase, GetSessionUseCase, JoinSessionUseCase,
        LeaveSessionUseCase, UpdateStateUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Watch-party playback synchronization server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository / Registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create session store and room registry (in-memory)
    let sessions = Arc::new(InMemorySessionRepository::new());
    let registry = Arc::new(InMemoryRoomRegistry::new());
    let clock = Arc::new(SystemClock);

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let join_session_usecase = Arc::new(JoinSessionUseCase::new(
        sessions.clone(),
        registry.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let leave_session_usecase = Arc::new(LeaveSessionUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let update_state_usecase = Arc::new(UpdateStateUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let create_session_usecase = Arc::new(CreateSessionUseCase::new(sessions.clone()));
    let get_session_usecase = Arc::new(GetSessionUseCase::new(sessions.clone()));

    // 4. Create AppState
    let state = Arc::new(AppState {
        join_session_usecase,
        leave_session_usecase,
        update_state_usecase,
        disconnect_usecase,
        create_session_usecase,
        get_session_usecase,
        message_pusher,
        registry,
    });

    // 5. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
