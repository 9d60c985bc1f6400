//! Inbound event handlers
//!
//! Decodes text frames into `ClientEvent`s and routes them to handlers.

mod chat;
mod error;

pub use chat::ChatHandler;
pub use error::{HandlerError, HandlerResult};

use crate::connection::Connection;
use crate::protocol::ClientEvent;
use crate::server::GatewayState;
use std::sync::Arc;

/// Routes inbound frames to handlers and reports failures to the socket
pub struct EventRouter;

impl EventRouter {
    /// Handle one text frame
    ///
    /// Failures are sent back as an `error` event and never close the socket.
    pub async fn handle_text(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
        if let Err(e) = Self::route(state, connection, text).await {
            if e.is_infrastructure() {
                tracing::error!(session_id = %connection.session_id(), error = %e, "Event failed");
            } else {
                tracing::debug!(session_id = %connection.session_id(), code = e.code(), error = %e, "Event rejected");
            }

            state
                .sockets()
                .send_to_session(connection.session_id(), e.to_error_event());
        }
    }

    async fn route(state: &GatewayState, connection: &Arc<Connection>, text: &str) -> HandlerResult<()> {
        // The bound identity is what counts: a frame read before the socket
        // closed is still processed once the connection is `Disconnected`.
        if connection.user_id().is_none() {
            return Err(HandlerError::NotAuthenticated);
        }

        let event = ClientEvent::from_json(text)?;

        tracing::trace!(
            session_id = %connection.session_id(),
            event = event.name(),
            "Event received"
        );

        // Only the wait is bounded. The event runs on its own task, so a slow
        // bus never leaves a stored message unpublished.
        let timeout = state.config().event_timeout();
        let task_state = state.clone();
        let task_connection = connection.clone();
        let task = tokio::spawn(async move {
            match event {
                ClientEvent::CreateRoom(payload) => {
                    ChatHandler::create_room(&task_state, &task_connection, payload).await
                }
                ClientEvent::SendMessage(payload) => {
                    ChatHandler::send_message(&task_state, &task_connection, payload).await
                }
            }
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(joined) => joined?,
            Err(_) => Err(HandlerError::Timeout(timeout)),
        }
    }
}
