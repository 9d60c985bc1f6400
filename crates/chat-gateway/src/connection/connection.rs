//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its lifecycle state.

use crate::protocol::ServerEvent;
use chat_core::UserId;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Connection state
///
/// `Connecting -> Authenticated -> Active`, and any state may move to the
/// terminal `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    /// Socket accepted, identity not yet bound
    Connecting,
    /// Token verified and user bound
    Authenticated,
    /// Taking part in at least one room
    Active,
    /// Connection is closed
    Disconnected,
}

impl ConnectionState {
    /// Check whether moving to `next` is allowed
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Authenticated)
                | (Self::Authenticated | Self::Active, Self::Active)
                | (_, Self::Disconnected)
        )
    }

    /// Whether events from this connection may be processed
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated | Self::Active)
    }
}

/// Rejected state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid connection transition {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Authenticated user ID (None until authenticated)
    user_id: Mutex<Option<UserId>>,

    /// Current connection state
    state: Mutex<ConnectionState>,

    /// Outbound queue drained by the socket's send task
    sender: mpsc::UnboundedSender<ServerEvent>,

    /// Last frame received from the client
    last_seen: Mutex<Instant>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(session_id: String, sender: mpsc::UnboundedSender<ServerEvent>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            user_id: Mutex::new(None),
            state: Mutex::new(ConnectionState::Connecting),
            sender,
            last_seen: Mutex::new(Instant::now()),
            created_at: Instant::now(),
        })
    }

    /// Generate a new session ID
    pub fn generate_session_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the user ID (if authenticated)
    pub fn user_id(&self) -> Option<UserId> {
        *self.user_id.lock()
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Check if the connection is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Move to a new state if the transition is allowed
    pub fn transition(&self, next: ConnectionState) -> Result<(), InvalidTransition> {
        let mut state = self.state.lock();
        if state.can_transition_to(next) {
            *state = next;
            Ok(())
        } else {
            Err(InvalidTransition {
                from: *state,
                to: next,
            })
        }
    }

    /// Bind the verified user and move to `Authenticated`
    pub fn authenticate(&self, user_id: UserId) -> Result<(), InvalidTransition> {
        self.transition(ConnectionState::Authenticated)?;
        *self.user_id.lock() = Some(user_id);
        Ok(())
    }

    /// Move to `Active`; a no-op if already active
    pub fn activate(&self) -> Result<(), InvalidTransition> {
        self.transition(ConnectionState::Active)
    }

    /// Record that a frame arrived from the client
    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    /// Time since the client last sent anything
    pub fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Queue an event for this connection
    ///
    /// Returns false once the socket's send task is gone.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id())
            .field("state", &self.state())
            .field("created_at", &self.created_at)
            .finish()
    }
}
