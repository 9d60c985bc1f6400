//! Event broadcasting
//!
//! Delivers fan-out events from the Redis subscriber to WebSocket connections.

mod dispatcher;

pub use dispatcher::FanoutDispatcher;

use crate::protocol::ServerEvent;
use chat_core::UserId;

/// Push side of the socket layer
///
/// The dispatcher and handlers only talk to sockets through this trait, so
/// tests can swap in a recording implementation.
pub trait SocketBroadcast: Send + Sync {
    /// Queue an event for one session; false if the session is gone
    fn send_to_session(&self, session_id: &str, event: ServerEvent) -> bool;

    /// Queue an event on every connection of a user, returning how many took it
    fn send_to_user(&self, user_id: UserId, event: &ServerEvent) -> usize;

    /// Queue an event on every authenticated connection
    fn broadcast(&self, event: &ServerEvent) -> usize;
}
