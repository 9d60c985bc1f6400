//! Chat message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chat_messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
