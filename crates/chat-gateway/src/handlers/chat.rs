//! createRoom and sendMessage handlers

use super::{HandlerError, HandlerResult};
use crate::connection::{Connection, ConnectionState};
use crate::protocol::{CreateRoomPayload, SendMessagePayload, ServerEvent};
use crate::server::GatewayState;
use chat_service::ChatService;
use std::sync::Arc;

/// Handles room and message events
pub struct ChatHandler;

impl ChatHandler {
    /// Create (or fetch) the room and answer the requesting socket only
    pub async fn create_room(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: CreateRoomPayload,
    ) -> HandlerResult<()> {
        let user_id = connection.user_id().ok_or(HandlerError::NotAuthenticated)?;

        let room = ChatService::new(state.service_context())
            .create_room(user_id, &payload.participants, &payload.chatroom_name)
            .await?;

        state.dispatcher().remember_room(room.id, room.participants);
        Self::join_room_scope(connection);

        state
            .sockets()
            .send_to_session(connection.session_id(), ServerEvent::room_created(&room));

        tracing::info!(
            session_id = %connection.session_id(),
            room_id = %room.id,
            "Room ready for connection"
        );

        Ok(())
    }

    /// Persist and publish a message
    ///
    /// Nothing is pushed to sockets here; the sender sees the message when
    /// it comes back through the bus like everyone else.
    pub async fn send_message(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: SendMessagePayload,
    ) -> HandlerResult<()> {
        let user_id = connection.user_id().ok_or(HandlerError::NotAuthenticated)?;

        let message = ChatService::new(state.service_context())
            .send_message(payload.room_id, user_id, &payload.content, None)
            .await?;

        Self::join_room_scope(connection);

        tracing::debug!(
            session_id = %connection.session_id(),
            message_id = %message.id,
            room_id = %message.room_id,
            "Message accepted"
        );

        Ok(())
    }

    fn join_room_scope(connection: &Connection) {
        if connection.state() == ConnectionState::Authenticated {
            if let Err(e) = connection.activate() {
                tracing::debug!(session_id = %connection.session_id(), error = %e, "Connection not activated");
            }
        }
    }
}
