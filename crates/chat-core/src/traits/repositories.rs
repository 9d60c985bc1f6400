//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every method reports failures as a
//! `DomainError` so callers can react to the kind of failure.

use async_trait::async_trait;

use crate::entities::{FavoriteRoom, Message, NewMessage, NewRoom, Room, User};
use crate::error::DomainError;
use crate::value_objects::{ParticipantPair, RoomId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>>;

    /// Find the room shared by a participant pair (order independent)
    async fn find_by_participants(&self, participants: ParticipantPair) -> RepoResult<Option<Room>>;

    /// Create a room, or return the existing room for the same pair
    async fn create(&self, room: &NewRoom) -> RepoResult<Room>;

    /// List rooms a user participates in, newest first
    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<Room>>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a validated message with a server timestamp
    ///
    /// Fails with `RoomNotFound` when the room does not exist.
    async fn save(&self, message: &NewMessage) -> RepoResult<Message>;

    /// List messages of a room in ascending creation order
    async fn list_by_room(&self, room_id: RoomId) -> RepoResult<Vec<Message>>;
}

// ============================================================================
// User Directory
// ============================================================================

/// Read-only view of the users owned by the profile subsystem
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
}

// ============================================================================
// Favorite Repository
// ============================================================================

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Mark a room as favorite (idempotent)
    async fn add(&self, user_id: UserId, room_id: RoomId) -> RepoResult<()>;

    /// Remove a favorite mark (idempotent)
    async fn remove(&self, user_id: UserId, room_id: RoomId) -> RepoResult<()>;

    /// List favorites of a user, most recent first
    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<FavoriteRoom>>;
}
