//! Integration tests for the watch-party synchronization protocol.
//!
//! These tests wire the real in-memory components together (session store,
//! room registry, WebSocket message pusher) and drive the protocol through
//! the same message handlers the WebSocket endpoint dispatches to, asserting
//! on the JSON frames each connected client receives.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use serde_json::{Value, json};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use watch_party_rs::{
    common::time::Clock,
    domain::{ClientId, MessagePusher, RoomRegistry},
    infrastructure::{InMemoryRoomRegistry, InMemorySessionRepository, WebSocketMessagePusher},
    ui::{
        handler::websocket::{handle_disconnect, handle_message},
        state::AppState,
    },
    usecase::{
        CreateSessionUseCase, DisconnectUseCase, GetSessionUseCase, JoinSessionUseCase,
        LeaveSessionUseCase, UpdateStateUseCase,
    },
};

/// Manually advanceable clock shared by every use case in a test
struct StepClock {
    now: AtomicI64,
}

impl StepClock {
    fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for StepClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Real component graph plus handles the tests drive the protocol through
struct TestHarness {
    state: Arc<AppState>,
    clock: Arc<StepClock>,
}

impl TestHarness {
    fn new(start_millis: i64) -> Self {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let clock = Arc::new(StepClock::new(start_millis));

        let state = Arc::new(AppState {
            join_session_usecase: Arc::new(JoinSessionUseCase::new(
                sessions.clone(),
                registry.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            leave_session_usecase: Arc::new(LeaveSessionUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            update_state_usecase: Arc::new(UpdateStateUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            disconnect_usecase: Arc::new(DisconnectUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            create_session_usecase: Arc::new(CreateSessionUseCase::new(sessions.clone())),
            get_session_usecase: Arc::new(GetSessionUseCase::new(sessions.clone())),
            message_pusher,
            registry,
        });

        Self { state, clock }
    }

    /// Create a viewing session through the HTTP use case, returning its ID
    async fn create_session(&self) -> String {
        self.state
            .create_session_usecase
            .execute(
                "host-user".to_string(),
                "https://example.com/video".to_string(),
            )
            .await
            .expect("session creation should succeed")
            .id
            .into_string()
    }

    /// Register a client with the message pusher, as the WebSocket endpoint
    /// does on upgrade, and return its inbound frame receiver
    async fn connect(&self, id: &str) -> (ClientId, UnboundedReceiver<String>) {
        let client_id = ClientId::new(id.to_string()).expect("valid client id");
        let (tx, rx) = mpsc::unbounded_channel();
        self.state
            .message_pusher
            .register_client(client_id.clone(), tx)
            .await
            .expect("client registration should succeed");
        (client_id, rx)
    }

    /// Deliver one inbound frame as if it arrived on the client's socket
    async fn send(&self, client_id: &ClientId, frame: Value) {
        handle_message(&self.state, client_id, &frame.to_string()).await;
    }
}

/// Pop the next frame from a client's channel, parsed as JSON
fn recv_json(rx: &mut UnboundedReceiver<String>) -> Value {
    let text = rx.try_recv().expect("expected a frame to be delivered");
    serde_json::from_str(&text).expect("frames are valid JSON")
}

fn assert_no_frame(rx: &mut UnboundedReceiver<String>) {
    assert!(
        rx.try_recv().is_err(),
        "expected no further frames for this client"
    );
}

#[tokio::test]
async fn test_full_synchronization_scenario() {
    // Two viewers join the same session, the first one starts playback,
    // then both leave. Each step asserts exactly who got notified.
    let harness = TestHarness::new(1_000_000);
    let session_id = harness.create_session().await;

    let (x, mut x_rx) = harness.connect("client-x").await;
    let (y, mut y_rx) = harness.connect("client-y").await;

    // X joins an empty room and receives the initial paused state
    harness
        .send(&x, json!({"type": "joinSession", "sessionId": session_id}))
        .await;
    let frame = recv_json(&mut x_rx);
    assert_eq!(frame["type"], "stateUpdate");
    assert_eq!(frame["isPlaying"], false);
    assert_eq!(frame["currentTime"], 0.0);
    assert_no_frame(&mut x_rx);

    // Y joins; Y gets the state snapshot, X gets the presence event
    harness
        .send(&y, json!({"type": "joinSession", "sessionId": session_id}))
        .await;
    let frame = recv_json(&mut y_rx);
    assert_eq!(frame["type"], "stateUpdate");
    assert_eq!(frame["isPlaying"], false);
    let frame = recv_json(&mut x_rx);
    assert_eq!(frame["type"], "participantJoined");
    assert_eq!(frame["participantId"], "client-y");
    assert_eq!(frame["totalParticipants"], 2);
    assert_no_frame(&mut y_rx);

    // X starts playback at 5s; only Y is notified (sender excluded)
    harness
        .send(
            &x,
            json!({
                "type": "updateState",
                "sessionId": session_id,
                "isPlaying": true,
                "currentTime": 5.0
            }),
        )
        .await;
    let frame = recv_json(&mut y_rx);
    assert_eq!(frame["type"], "stateUpdate");
    assert_eq!(frame["isPlaying"], true);
    assert_eq!(frame["currentTime"], 5.0);
    assert_eq!(frame["timestamp"], 1_000_000);
    assert_no_frame(&mut x_rx);

    // Y leaves; X is told, Y hears nothing
    harness
        .send(&y, json!({"type": "leaveSession", "sessionId": session_id}))
        .await;
    let frame = recv_json(&mut x_rx);
    assert_eq!(frame["type"], "participantLeft");
    assert_eq!(frame["participantId"], "client-y");
    assert_eq!(frame["totalParticipants"], 1);
    assert_no_frame(&mut y_rx);

    // X leaves last; the room is discarded
    harness
        .send(&x, json!({"type": "leaveSession", "sessionId": session_id}))
        .await;
    assert_no_frame(&mut x_rx);
    assert_eq!(harness.state.registry.room_count().await, 0);
}

#[tokio::test]
async fn test_join_unknown_session_is_rejected() {
    let harness = TestHarness::new(1_000_000);
    let (x, mut x_rx) = harness.connect("client-x").await;

    harness
        .send(&x, json!({"type": "joinSession", "sessionId": "no-such-session"}))
        .await;

    let frame = recv_json(&mut x_rx);
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "SESSION_NOT_FOUND");
    assert_eq!(frame["details"]["sessionId"], "no-such-session");
    // No room is created as a side effect of the rejected join
    assert_eq!(harness.state.registry.room_count().await, 0);
}

#[tokio::test]
async fn test_update_state_without_membership_is_forbidden() {
    let harness = TestHarness::new(1_000_000);
    let session_id = harness.create_session().await;

    let (x, mut x_rx) = harness.connect("client-x").await;
    let (z, mut z_rx) = harness.connect("client-z").await;

    harness
        .send(&x, json!({"type": "joinSession", "sessionId": session_id}))
        .await;
    recv_json(&mut x_rx); // initial state snapshot

    // Z is connected but never joined the room
    harness
        .send(
            &z,
            json!({
                "type": "updateState",
                "sessionId": session_id,
                "isPlaying": true,
                "currentTime": 42.0
            }),
        )
        .await;

    let frame = recv_json(&mut z_rx);
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "FORBIDDEN");
    assert_eq!(frame["details"]["sessionId"], session_id);
    // The room state is untouched and X never hears about it
    assert_no_frame(&mut x_rx);
    let session =
        watch_party_rs::domain::SessionId::new(session_id.clone()).expect("valid session id");
    let room = harness.state.registry.get(&session).await.expect("room exists");
    assert!(!room.is_playing);
    assert_eq!(room.position, 0.0);
}

#[tokio::test]
async fn test_malformed_frame_yields_error_event() {
    let harness = TestHarness::new(1_000_000);
    let (x, mut x_rx) = harness.connect("client-x").await;

    handle_message(&harness.state, &x, "this is not json").await;

    let frame = recv_json(&mut x_rx);
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "INVALID_MESSAGE");
    assert_eq!(frame["message"], "Malformed message");
}

#[tokio::test]
async fn test_late_joiner_receives_drift_compensated_position() {
    let harness = TestHarness::new(1_000_000);
    let session_id = harness.create_session().await;

    let (x, mut x_rx) = harness.connect("client-x").await;
    harness
        .send(&x, json!({"type": "joinSession", "sessionId": session_id}))
        .await;
    recv_json(&mut x_rx);

    // Playback starts at 10s, then 4 seconds of wall clock pass
    harness
        .send(
            &x,
            json!({
                "type": "updateState",
                "sessionId": session_id,
                "isPlaying": true,
                "currentTime": 10.0
            }),
        )
        .await;
    harness.clock.advance(4_000);

    let (y, mut y_rx) = harness.connect("client-y").await;
    harness
        .send(&y, json!({"type": "joinSession", "sessionId": session_id}))
        .await;

    let frame = recv_json(&mut y_rx);
    assert_eq!(frame["type"], "stateUpdate");
    assert_eq!(frame["isPlaying"], true);
    let current_time = frame["currentTime"].as_f64().unwrap();
    assert!((current_time - 14.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_paused_room_position_does_not_drift() {
    let harness = TestHarness::new(1_000_000);
    let session_id = harness.create_session().await;

    let (x, mut x_rx) = harness.connect("client-x").await;
    harness
        .send(&x, json!({"type": "joinSession", "sessionId": session_id}))
        .await;
    recv_json(&mut x_rx);

    harness
        .send(
            &x,
            json!({
                "type": "updateState",
                "sessionId": session_id,
                "isPlaying": false,
                "currentTime": 7.5
            }),
        )
        .await;
    harness.clock.advance(60_000);

    let (y, mut y_rx) = harness.connect("client-y").await;
    harness
        .send(&y, json!({"type": "joinSession", "sessionId": session_id}))
        .await;

    let frame = recv_json(&mut y_rx);
    assert_eq!(frame["isPlaying"], false);
    assert_eq!(frame["currentTime"], 7.5);
}

#[tokio::test]
async fn test_disconnect_leaves_every_joined_room() {
    let harness = TestHarness::new(1_000_000);
    let session_a = harness.create_session().await;
    let session_b = harness.create_session().await;

    let (x, mut x_rx) = harness.connect("client-x").await;
    let (y, mut y_rx) = harness.connect("client-y").await;

    for session in [&session_a, &session_b] {
        harness
            .send(&x, json!({"type": "joinSession", "sessionId": session}))
            .await;
        harness
            .send(&y, json!({"type": "joinSession", "sessionId": session}))
            .await;
    }
    while x_rx.try_recv().is_ok() {}
    while y_rx.try_recv().is_ok() {}

    // X's socket drops without an explicit leave
    handle_disconnect(&harness.state, &x).await;

    // Y is notified once per shared room
    for _ in 0..2 {
        let frame = recv_json(&mut y_rx);
        assert_eq!(frame["type"], "participantLeft");
        assert_eq!(frame["participantId"], "client-x");
        assert_eq!(frame["totalParticipants"], 1);
    }
    assert_no_frame(&mut y_rx);

    // Both rooms survive with Y as the sole participant
    assert_eq!(harness.state.registry.room_count().await, 2);

    // The connection slot is freed, so the same ID may reconnect
    let (tx, _rx) = mpsc::unbounded_channel();
    assert!(
        harness
            .state
            .message_pusher
            .register_client(x.clone(), tx)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_leave_without_membership_is_a_silent_noop() {
    let harness = TestHarness::new(1_000_000);
    let session_id = harness.create_session().await;

    let (x, mut x_rx) = harness.connect("client-x").await;
    let (y, mut y_rx) = harness.connect("client-y").await;

    harness
        .send(&x, json!({"type": "joinSession", "sessionId": session_id}))
        .await;
    recv_json(&mut x_rx);

    // Y never joined; leaving produces no frames and no state change
    harness
        .send(&y, json!({"type": "leaveSession", "sessionId": session_id}))
        .await;

    assert_no_frame(&mut y_rx);
    assert_no_frame(&mut x_rx);
    assert_eq!(harness.state.registry.room_count().await, 1);
}
