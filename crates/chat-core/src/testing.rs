//! In-memory implementations of the store and bus ports
//!
//! Used by the service and gateway test suites so that use cases can be
//! exercised without PostgreSQL or Redis.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::entities::{FavoriteRoom, Message, NewMessage, NewRoom, Room, User};
use crate::error::DomainError;
use crate::events::FanoutEvent;
use crate::traits::{
    EventBus, FavoriteRepository, MessageRepository, RepoResult, RoomRepository, UserDirectory,
};
use crate::value_objects::{MessageId, ParticipantPair, RoomId, UserId};

// ============================================================================
// Rooms
// ============================================================================

#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<Vec<Room>>,
    next_id: AtomicI64,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rooms
    pub fn len(&self) -> usize {
        self.rooms.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.lock().is_empty()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>> {
        Ok(self.rooms.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_participants(&self, participants: ParticipantPair) -> RepoResult<Option<Room>> {
        Ok(self
            .rooms
            .lock()
            .iter()
            .find(|r| r.participants == participants)
            .cloned())
    }

    async fn create(&self, room: &NewRoom) -> RepoResult<Room> {
        // Lookup and insert under one lock, like the unique constraint in storage
        let mut rooms = self.rooms.lock();
        if let Some(existing) = rooms.iter().find(|r| r.participants == room.participants) {
            return Ok(existing.clone());
        }

        let created = Room {
            id: RoomId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            name: room.name.clone(),
            participants: room.participants,
            created_by: room.created_by,
            created_at: Utc::now(),
        };
        rooms.push(created.clone());
        Ok(created)
    }

    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self
            .rooms
            .lock()
            .iter()
            .filter(|r| r.has_participant(user_id))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rooms)
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Message store that checks room existence against a shared room list
pub struct InMemoryMessageRepository {
    rooms: std::sync::Arc<InMemoryRoomRepository>,
    messages: Mutex<Vec<Message>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl InMemoryMessageRepository {
    pub fn new(rooms: std::sync::Arc<InMemoryRoomRepository>) -> Self {
        Self {
            rooms,
            messages: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulate a database outage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Total number of stored messages
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn save(&self, message: &NewMessage) -> RepoResult<Message> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection refused".to_string()));
        }
        if self.rooms.find_by_id(message.room_id()).await?.is_none() {
            return Err(DomainError::RoomNotFound(message.room_id()));
        }

        let saved = Message {
            id: MessageId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            room_id: message.room_id(),
            sender_id: message.sender_id(),
            content: message.content().to_string(),
            created_at: Utc::now(),
            read: false,
        };
        self.messages.lock().push(saved.clone());
        Ok(saved)
    }

    async fn list_by_room(&self, room_id: RoomId) -> RepoResult<Vec<Message>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection refused".to_string()));
        }
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory pre-populated with `(id, nickname)` pairs
    pub fn with_users(users: &[(i64, &str)]) -> Self {
        let directory = Self::new();
        for (id, nickname) in users {
            directory.insert(User::new(UserId::new(*id), *nickname));
        }
        directory
    }

    pub fn insert(&self, user: User) {
        self.users.lock().insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.users.lock().get(&id).cloned())
    }
}

// ============================================================================
// Favorites
// ============================================================================

#[derive(Default)]
pub struct InMemoryFavoriteRepository {
    favorites: Mutex<Vec<FavoriteRoom>>,
}

impl InMemoryFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    async fn add(&self, user_id: UserId, room_id: RoomId) -> RepoResult<()> {
        let mut favorites = self.favorites.lock();
        if !favorites
            .iter()
            .any(|f| f.user_id == user_id && f.room_id == room_id)
        {
            favorites.push(FavoriteRoom {
                user_id,
                room_id,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn remove(&self, user_id: UserId, room_id: RoomId) -> RepoResult<()> {
        self.favorites
            .lock()
            .retain(|f| !(f.user_id == user_id && f.room_id == room_id));
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<FavoriteRoom>> {
        let mut favorites: Vec<FavoriteRoom> = self
            .favorites
            .lock()
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        favorites.reverse();
        Ok(favorites)
    }
}

// ============================================================================
// Bus
// ============================================================================

/// Bus that records every published event and forwards it to local receivers
pub struct InMemoryEventBus {
    published: Mutex<Vec<FanoutEvent>>,
    sender: broadcast::Sender<FanoutEvent>,
    unavailable: AtomicBool,
    publish_delay: Mutex<Option<Duration>>,
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self {
            published: Mutex::new(Vec::new()),
            sender,
            unavailable: AtomicBool::new(false),
            publish_delay: Mutex::new(None),
        }
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<FanoutEvent> {
        self.sender.subscribe()
    }

    /// Events published so far
    pub fn published(&self) -> Vec<FanoutEvent> {
        self.published.lock().clone()
    }

    /// Simulate a bus outage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Simulate a slow broker
    pub fn set_publish_delay(&self, delay: Duration) {
        *self.publish_delay.lock() = Some(delay);
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: &FanoutEvent) -> RepoResult<()> {
        let delay = *self.publish_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::BusUnavailable("bus offline".to_string()));
        }
        self.published.lock().push(event.clone());
        // No receivers is fine for fire-and-forget
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}
