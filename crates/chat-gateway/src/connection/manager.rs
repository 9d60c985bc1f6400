//! Connection manager
//!
//! Manages all active WebSocket connections using DashMap for thread-safe access.

use super::Connection;
use crate::broadcast::SocketBroadcast;
use crate::protocol::ServerEvent;
use chat_core::UserId;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Manages all active WebSocket connections
///
/// Uses `DashMap` for concurrent access to connection state.
pub struct ConnectionManager {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// User ID to session IDs mapping
    user_connections: DashMap<UserId, HashSet<String>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        session_id: String,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection added");

        connection
    }

    /// Remove a connection
    ///
    /// Uses `alter` for atomic modify-and-cleanup operations to avoid TOCTOU race conditions.
    pub fn remove_connection(&self, session_id: &str) {
        if let Some((_, connection)) = self.connections.remove(session_id) {
            // Ignore the transition error; a connection may already be closed
            let _ = connection.transition(super::ConnectionState::Disconnected);

            if let Some(user_id) = connection.user_id() {
                self.user_connections.alter(&user_id, |_, mut sessions| {
                    sessions.remove(session_id);
                    sessions
                });

                self.user_connections.retain(|_, sessions| !sessions.is_empty());
            }

            tracing::debug!(
                session_id = %session_id,
                age_secs = connection.age().as_secs(),
                "Connection removed"
            );
        }
    }

    /// Get a connection by session ID
    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Bind a verified user to a connection
    ///
    /// Returns false when the session is unknown or already bound.
    pub fn authenticate_connection(&self, session_id: &str, user_id: UserId) -> bool {
        let Some(connection) = self.get_connection(session_id) else {
            return false;
        };

        if let Err(e) = connection.authenticate(user_id) {
            tracing::warn!(session_id = %session_id, error = %e, "Connection already bound");
            return false;
        }

        self.user_connections
            .entry(user_id)
            .or_default()
            .insert(session_id.to_string());

        tracing::debug!(
            session_id = %session_id,
            user_id = %user_id,
            "Connection authenticated"
        );

        true
    }

    /// Get all connections for a user
    pub fn get_user_connections(&self, user_id: UserId) -> Vec<Arc<Connection>> {
        self.user_connections
            .get(&user_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of unique authenticated users
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    /// Check if a session exists
    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }

    /// Drop connections whose send task has gone away
    ///
    /// Catches sockets whose handler ended without reaching its own cleanup.
    pub fn cleanup_closed_connections(&self) -> usize {
        let closed: Vec<String> = self
            .connections
            .iter()
            .filter(|r| r.is_closed())
            .map(|r| r.key().clone())
            .collect();

        let count = closed.len();

        for session_id in closed {
            self.remove_connection(&session_id);
        }

        if count > 0 {
            tracing::info!(count = count, "Cleaned up closed connections");
        }

        count
    }
}

/// Sweep closed connections on a fixed period until the task is aborted
pub fn spawn_sweeper(manager: Arc<ConnectionManager>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            manager.cleanup_closed_connections();
        }
    })
}

impl SocketBroadcast for ConnectionManager {
    fn send_to_session(&self, session_id: &str, event: ServerEvent) -> bool {
        self.get_connection(session_id)
            .is_some_and(|conn| conn.send(event))
    }

    fn send_to_user(&self, user_id: UserId, event: &ServerEvent) -> usize {
        let sent = self
            .get_user_connections(user_id)
            .into_iter()
            .filter(|conn| conn.send(event.clone()))
            .count();

        tracing::trace!(
            user_id = %user_id,
            event = event.name(),
            sent = sent,
            "Event sent to user connections"
        );

        sent
    }

    fn broadcast(&self, event: &ServerEvent) -> usize {
        let sent = self
            .connections
            .iter()
            .filter(|conn| conn.is_authenticated() && conn.send(event.clone()))
            .count();

        tracing::debug!(event = event.name(), sent = sent, "Event broadcast to all connections");

        sent
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .finish()
    }
}
