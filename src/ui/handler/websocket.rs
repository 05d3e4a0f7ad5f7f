//! WebSocket connection handlers.
//!
//! One reader/writer task pair per connection. Inbound frames are parsed and
//! dispatched to the use cases; every mutation commits in the registry before
//! any fan-out happens, and a slow receiver never stalls the sender (outbound
//! delivery goes through unbounded channels).

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    domain::{ClientId, MessagePushError, MessagePusher, SessionId},
    infrastructure::dto::websocket::{
        ErrorMessage, InboundMessage, MessageType, ParticipantJoinedMessage,
        ParticipantLeftMessage, StateUpdateMessage,
    },
    ui::state::AppState,
    usecase::SyncError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Connection identifier; a uuid v4 is minted when absent
    pub client_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let client_id_str = query
        .client_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Convert String -> ClientId (Domain Model)
    let client_id = match ClientId::try_from(client_id_str.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid client_id format: '{}'", client_id_str);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    match state.message_pusher.register_client(client_id.clone(), tx).await {
        Ok(()) => {
            tracing::info!("Client '{}' connected and registered", client_id_str);
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client_id, rx)))
        }
        Err(MessagePushError::DuplicateClient(_)) => {
            tracing::warn!(
                "Client with ID '{}' is already connected. Rejecting connection.",
                client_id_str
            );
            Err(StatusCode::CONFLICT)
        }
        Err(e) => {
            tracing::error!("Failed to register client '{}': {}", client_id_str, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events destined for this
/// client (pushed by any use case) are forwarded to its WebSocket connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: ClientId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    // Spawn a task to forward pushed events to this client
    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let recv_client_id = client_id.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_message(&recv_state, &recv_client_id, text.as_ref()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_client_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    handle_disconnect(&state, &client_id).await;
}

/// Parse one inbound frame and dispatch it to the matching protocol event.
///
/// All failures are converted to an `error` event sent to the originating
/// connection only; they never crash the connection task.
pub async fn handle_message(state: &Arc<AppState>, client_id: &ClientId, text: &str) {
    tracing::debug!("Received text from '{}': {}", client_id, text);

    let inbound = match serde_json::from_str::<InboundMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Failed to parse message from '{}': {}", client_id, e);
            push_error_event(state, client_id, ErrorMessage::invalid_message()).await;
            return;
        }
    };

    match inbound {
        InboundMessage::JoinSession { session_id } => {
            handle_join_session(state, client_id, session_id).await;
        }
        InboundMessage::LeaveSession { session_id } => {
            handle_leave_session(state, client_id, session_id).await;
        }
        InboundMessage::UpdateState {
            session_id,
            is_playing,
            current_time,
        } => {
            handle_update_state(state, client_id, session_id, is_playing, current_time).await;
        }
    }
}

/// Implicit leave for every room the connection belongs to.
///
/// Safe to call for connections that never completed a join.
pub async fn handle_disconnect(state: &Arc<AppState>, client_id: &ClientId) {
    let departures = state.disconnect_usecase.execute(client_id).await;

    for (session_id, left) in departures {
        if left.remaining.is_empty() {
            continue;
        }

        let left_msg = ParticipantLeftMessage {
            r#type: MessageType::ParticipantLeft,
            participant_id: client_id.as_str().to_string(),
            total_participants: left.total_participants,
        };
        let left_json = serde_json::to_string(&left_msg).unwrap();

        if let Err(e) = state
            .disconnect_usecase
            .broadcast_participant_left(left.remaining, &left_json)
            .await
        {
            tracing::warn!(
                "Failed to broadcast participant-left for session '{}': {}",
                session_id,
                e
            );
        }
    }

    tracing::info!("Client '{}' disconnected and removed from registry", client_id);
}

async fn handle_join_session(state: &Arc<AppState>, client_id: &ClientId, session_id: String) {
    let session_id = match SessionId::try_from(session_id) {
        Ok(id) => id,
        Err(_) => {
            push_error_event(state, client_id, ErrorMessage::invalid_message()).await;
            return;
        }
    };

    match state
        .join_session_usecase
        .execute(&session_id, client_id.clone())
        .await
    {
        Ok(joined) => {
            // Reply to the joiner with the drift-compensated current state
            let state_msg = StateUpdateMessage {
                r#type: MessageType::StateUpdate,
                is_playing: joined.is_playing,
                current_time: joined.current_time,
                timestamp: joined.timestamp.value(),
            };
            let state_json = serde_json::to_string(&state_msg).unwrap();
            if let Err(e) = state
                .join_session_usecase
                .push_state_to_joiner(client_id, &state_json)
                .await
            {
                tracing::error!("Failed to send state to joiner '{}': {}", client_id, e);
                return;
            }
            tracing::info!(
                "Client '{}' joined session '{}' ({} participants)",
                client_id,
                session_id,
                joined.total_participants
            );

            // Broadcast presence to the rest of the room
            let joined_msg = ParticipantJoinedMessage {
                r#type: MessageType::ParticipantJoined,
                participant_id: client_id.as_str().to_string(),
                total_participants: joined.total_participants,
            };
            let joined_json = serde_json::to_string(&joined_msg).unwrap();
            if let Err(e) = state
                .join_session_usecase
                .broadcast_participant_joined(joined.others, &joined_json)
                .await
            {
                tracing::warn!("Failed to broadcast participant-joined: {}", e);
            }
        }
        Err(e) => {
            report_sync_error(state, client_id, &e).await;
        }
    }
}

async fn handle_leave_session(state: &Arc<AppState>, client_id: &ClientId, session_id: String) {
    let session_id = match SessionId::try_from(session_id) {
        Ok(id) => id,
        Err(_) => {
            push_error_event(state, client_id, ErrorMessage::invalid_message()).await;
            return;
        }
    };

    // Leaving a room the connection never joined is a silent no-op
    let Some(left) = state
        .leave_session_usecase
        .execute(&session_id, client_id)
        .await
    else {
        return;
    };

    tracing::info!("Client '{}' left session '{}'", client_id, session_id);

    if left.remaining.is_empty() {
        return;
    }

    let left_msg = ParticipantLeftMessage {
        r#type: MessageType::ParticipantLeft,
        participant_id: client_id.as_str().to_string(),
        total_participants: left.total_participants,
    };
    let left_json = serde_json::to_string(&left_msg).unwrap();
    if let Err(e) = state
        .leave_session_usecase
        .broadcast_participant_left(left.remaining, &left_json)
        .await
    {
        tracing::warn!("Failed to broadcast participant-left: {}", e);
    }
}

async fn handle_update_state(
    state: &Arc<AppState>,
    client_id: &ClientId,
    session_id: String,
    is_playing: bool,
    current_time: f64,
) {
    let session_id = match SessionId::try_from(session_id) {
        Ok(id) => id,
        Err(_) => {
            push_error_event(state, client_id, ErrorMessage::invalid_message()).await;
            return;
        }
    };

    match state
        .update_state_usecase
        .execute(&session_id, client_id, is_playing, current_time)
        .await
    {
        Ok(broadcast) => {
            let state_msg = StateUpdateMessage {
                r#type: MessageType::StateUpdate,
                is_playing: broadcast.is_playing,
                current_time: broadcast.current_time,
                timestamp: broadcast.timestamp,
            };
            let state_json = serde_json::to_string(&state_msg).unwrap();
            if let Err(e) = state
                .update_state_usecase
                .broadcast_state_update(broadcast.targets, &state_json)
                .await
            {
                tracing::warn!("Failed to broadcast state update: {}", e);
            }
        }
        Err(e) => {
            report_sync_error(state, client_id, &e).await;
        }
    }
}

/// Convert a protocol error into an `error` event for the originating
/// connection. Expected conditions (not-found, forbidden) are logged at
/// debug level only; internal failures are logged as errors.
async fn report_sync_error(state: &Arc<AppState>, client_id: &ClientId, err: &SyncError) {
    if err.is_expected() {
        tracing::debug!("Rejected event from '{}': {} ({})", client_id, err, err.code());
    } else {
        tracing::error!("Internal error handling event from '{}': {:?}", client_id, err);
    }

    let details = match err {
        SyncError::SessionNotFound { session_id } => {
            Some(serde_json::json!({ "sessionId": session_id }))
        }
        SyncError::Forbidden { session_id, .. } => {
            Some(serde_json::json!({ "sessionId": session_id }))
        }
        SyncError::Internal(_) => None,
    };

    let mut msg = ErrorMessage::new(err.to_string(), err.code());
    msg.details = details;
    push_error_event(state, client_id, msg).await;
}

async fn push_error_event(state: &Arc<AppState>, client_id: &ClientId, msg: ErrorMessage) {
    let json = serde_json::to_string(&msg).unwrap();
    if let Err(e) = state.message_pusher.push_to(client_id, &json).await {
        tracing::warn!("Failed to send error event to client '{}': {}", client_id, e);
    }
}
