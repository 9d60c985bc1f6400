//! Favorite room entity - a room a user pinned for quick access

use chrono::{DateTime, Utc};

use crate::value_objects::{RoomId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteRoom {
    pub user_id: UserId,
    pub room_id: RoomId,
    pub created_at: DateTime<Utc>,
}
