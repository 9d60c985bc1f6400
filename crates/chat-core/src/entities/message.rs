//! Message entity - one chat utterance inside a room

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{MessageId, RoomId, UserId};

/// Persisted chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// A message that passed validation and may be handed to the message store
///
/// This is the only way to build input for `MessageRepository::save`, so the
/// non-empty content rule lives here and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    room_id: RoomId,
    sender_id: UserId,
    content: String,
}

impl NewMessage {
    /// Maximum content length in characters
    pub const MAX_CONTENT_LENGTH: usize = 2000;

    /// Validate and build a new message
    ///
    /// Content is trimmed before it is checked and stored.
    ///
    /// # Errors
    /// Returns `EmptyMessage` for blank content and `MessageTooLong` when the
    /// trimmed content exceeds `MAX_CONTENT_LENGTH` characters
    pub fn new(room_id: RoomId, sender_id: UserId, content: &str) -> Result<Self, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyMessage);
        }
        if content.chars().count() > Self::MAX_CONTENT_LENGTH {
            return Err(DomainError::MessageTooLong {
                max: Self::MAX_CONTENT_LENGTH,
            });
        }

        Ok(Self {
            room_id,
            sender_id,
            content: content.to_string(),
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn sender_id(&self) -> UserId {
        self.sender_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
