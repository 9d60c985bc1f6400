//! Room entity - a durable one-to-one conversation

use chrono::{DateTime, Utc};

use crate::value_objects::{ParticipantPair, RoomId, UserId};

/// One-to-one chat room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub participants: ParticipantPair,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Check whether a user takes part in this room
    #[inline]
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participants.contains(user_id)
    }
}

/// Input for `RoomRepository::create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    pub participants: ParticipantPair,
    pub created_by: Option<UserId>,
}

impl NewRoom {
    pub fn new(name: impl Into<String>, participants: ParticipantPair) -> Self {
        Self {
            name: name.into(),
            participants,
            created_by: None,
        }
    }

    pub fn with_creator(mut self, user_id: UserId) -> Self {
        self.created_by = Some(user_id);
        self
    }
}

/// Derive a room label from the two participants' display names
pub fn derive_room_name(first: &str, second: &str) -> String {
    format!("{first} and {second}")
}
