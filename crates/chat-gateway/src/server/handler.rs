//! WebSocket handler
//!
//! Runs the token gate on the upgrade request, then drives one socket.

use crate::connection::Connection;
use crate::handlers::{EventRouter, HandlerError};
use crate::protocol::{CloseCode, ServerEvent};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use chat_core::{DomainError, UserId};
use chat_service::ChatService;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// Missed ping intervals tolerated before the socket is closed
const IDLE_INTERVALS: u32 = 3;

/// Handshake query string
#[derive(Debug, Default, Deserialize)]
pub struct HandshakeQuery {
    pub token: Option<String>,
}

/// `GET /chat` upgrade handler
///
/// A refused token answers `401` and no socket is created.
pub async fn chat_socket_handler(
    State(state): State<GatewayState>,
    Query(query): Query<HandshakeQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    match state.gate().admit(query.token.as_deref(), &headers) {
        Ok(user_id) => ws
            .on_upgrade(move |socket| handle_socket(state, socket, user_id))
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Drive an upgraded socket until either side goes away
async fn handle_socket(state: GatewayState, socket: WebSocket, user_id: UserId) {
    let session_id = Connection::generate_session_id();

    // Outgoing events for this socket
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let connection = state
        .connection_manager()
        .add_connection(session_id.clone(), tx);

    if !state
        .connection_manager()
        .authenticate_connection(&session_id, user_id)
    {
        cleanup_connection(&state, &session_id);
        return;
    }

    tracing::info!(session_id = %session_id, user_id = %user_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    state
        .sockets()
        .send_to_session(&session_id, ServerEvent::ready(user_id));
    prime_room_scope(&state, &connection, user_id).await;

    // Events are handled one at a time, in arrival order, on a task that
    // outlives the socket so accepted work still completes after a disconnect.
    let (work_tx, mut work_rx) = mpsc::unbounded_channel::<String>();
    let worker_state = state.clone();
    let worker_connection = connection.clone();
    tokio::spawn(async move {
        while let Some(text) = work_rx.recv().await {
            EventRouter::handle_text(&worker_state, &worker_connection, &text).await;
        }
    });

    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            connection_recv.touch();

            match msg {
                Ok(Message::Text(text)) => {
                    if work_tx.send(text).is_err() {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    let err = HandlerError::from(DomainError::InvalidPayload(
                        "binary frames are not supported".to_string(),
                    ));
                    state_recv
                        .sockets()
                        .send_to_session(&session_id_recv, err.to_error_event());
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Keepalive frame received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id_recv, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    let session_id_send = session_id.clone();
    let connection_send = connection.clone();
    let ping_interval = state.config().ping_interval();
    let idle_limit = ping_interval * IDLE_INTERVALS;

    let mut send_task = tokio::spawn(async move {
        let mut ticker = interval(ping_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    match event.to_json() {
                        Ok(json) => {
                            if ws_sink.send(Message::Text(json)).await.is_err() {
                                tracing::warn!(session_id = %session_id_send, "Failed to send event to WebSocket");
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::error!(session_id = %session_id_send, error = %e, "Failed to encode event");
                        }
                    }
                }
                _ = ticker.tick() => {
                    if connection_send.idle_for() > idle_limit {
                        tracing::warn!(
                            session_id = %session_id_send,
                            idle_secs = connection_send.idle_for().as_secs(),
                            "Connection timed out"
                        );
                        let frame = CloseCode::SessionTimedOut.frame();
                        let _ = ws_sink.send(Message::Close(Some(frame))).await;
                        return;
                    }

                    if ws_sink.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
            send_task.abort();
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
            recv_task.abort();
        }
    }

    cleanup_connection(&state, &session_id);
}

/// A user who already has rooms joins their scope right away
async fn prime_room_scope(state: &GatewayState, connection: &Arc<Connection>, user_id: UserId) {
    let service = ChatService::new(state.service_context());

    match tokio::time::timeout(state.config().event_timeout(), service.list_rooms(user_id)).await {
        Ok(Ok(rooms)) if !rooms.is_empty() => {
            for room in &rooms {
                state.dispatcher().remember_room(room.id, room.participants);
            }
            if let Err(e) = connection.activate() {
                tracing::debug!(session_id = %connection.session_id(), error = %e, "Connection not activated");
            }
        }
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            tracing::warn!(session_id = %connection.session_id(), error = %e, "Failed to load rooms on connect");
        }
        Err(_) => {
            tracing::warn!(session_id = %connection.session_id(), "Timed out loading rooms on connect");
        }
    }
}

/// Clean up a connection on disconnect
fn cleanup_connection(state: &GatewayState, session_id: &str) {
    tracing::info!(session_id = %session_id, "Cleaning up connection");
    state.connection_manager().remove_connection(session_id);
}
