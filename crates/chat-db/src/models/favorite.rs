//! Favorite room database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chat_favorite_rooms table
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteRoomModel {
    pub user_id: i64,
    pub room_id: i64,
    pub created_at: DateTime<Utc>,
}
