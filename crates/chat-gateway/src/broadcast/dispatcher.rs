//! Fan-out dispatcher
//!
//! Receives fan-out events from the Redis subscriber and delivers them as
//! `newMessage` to the local connections of the room's participants.

use super::SocketBroadcast;
use crate::protocol::ServerEvent;
use chat_common::DeliveryScope;
use chat_core::{FanoutEvent, ParticipantPair, RoomId};
use chat_service::{ChatService, ServiceContext};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Routes bus events to sockets
pub struct FanoutDispatcher {
    /// Push side of the socket layer
    sockets: Arc<dyn SocketBroadcast>,
    /// Used to resolve room participants on a cache miss
    services: Arc<ServiceContext>,
    /// Room participants seen so far; pairs never change once a room exists
    rooms: DashMap<RoomId, ParticipantPair>,
    scope: DeliveryScope,
    /// Whether the dispatcher is running
    running: AtomicBool,
}

impl FanoutDispatcher {
    /// Create a new dispatcher
    pub fn new(
        sockets: Arc<dyn SocketBroadcast>,
        services: Arc<ServiceContext>,
        scope: DeliveryScope,
    ) -> Self {
        Self {
            sockets,
            services,
            rooms: DashMap::new(),
            scope,
            running: AtomicBool::new(false),
        }
    }

    /// Start draining `receiver` on a background task
    pub fn start(self: Arc<Self>, receiver: broadcast::Receiver<FanoutEvent>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Fan-out dispatcher is already running");
            return;
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run(receiver).await;
        });

        tracing::info!(scope = ?self.scope, "Fan-out dispatcher started");
    }

    /// Stop after the event currently being delivered
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Fan-out dispatcher stopped");
    }

    /// Check if the dispatcher is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Delivery scope in use
    pub fn scope(&self) -> DeliveryScope {
        self.scope
    }

    async fn run(&self, mut receiver: broadcast::Receiver<FanoutEvent>) {
        while self.running.load(Ordering::SeqCst) {
            match receiver.recv().await {
                Ok(event) => {
                    self.dispatch(event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "Fan-out dispatcher lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("Fan-out channel closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Fan-out dispatcher loop ended");
    }

    /// Deliver one event, returning how many connections it was queued on
    pub async fn dispatch(&self, event: FanoutEvent) -> usize {
        let room_id = event.room;

        if self.scope == DeliveryScope::Broadcast {
            let sent = self.sockets.broadcast(&ServerEvent::NewMessage(event));
            tracing::trace!(room_id = %room_id, sent = sent, "Fan-out event broadcast");
            return sent;
        }

        let Some(pair) = self.participants(room_id).await else {
            return 0;
        };

        let message = ServerEvent::NewMessage(event);
        let sent = self.sockets.send_to_user(pair.low(), &message)
            + self.sockets.send_to_user(pair.high(), &message);

        tracing::trace!(room_id = %room_id, sent = sent, "Fan-out event delivered to room");

        sent
    }

    /// Record a room's participants so the next event skips the store lookup
    pub fn remember_room(&self, room_id: RoomId, participants: ParticipantPair) {
        self.rooms.insert(room_id, participants);
    }

    /// Number of rooms in the participant cache
    pub fn cached_rooms(&self) -> usize {
        self.rooms.len()
    }

    async fn participants(&self, room_id: RoomId) -> Option<ParticipantPair> {
        if let Some(pair) = self.rooms.get(&room_id) {
            return Some(*pair);
        }

        match ChatService::new(&self.services).room_participants(room_id).await {
            Ok(Some(pair)) => {
                self.remember_room(room_id, pair);
                Some(pair)
            }
            Ok(None) => {
                tracing::warn!(room_id = %room_id, "Fan-out event for unknown room dropped");
                None
            }
            Err(e) => {
                tracing::error!(room_id = %room_id, error = %e, "Failed to resolve room participants");
                None
            }
        }
    }
}

impl std::fmt::Debug for FanoutDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutDispatcher")
            .field("scope", &self.scope)
            .field("cached_rooms", &self.rooms.len())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
