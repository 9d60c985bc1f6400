//! Chat room database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chat_rooms table
#[derive(Debug, Clone, FromRow)]
pub struct RoomModel {
    pub id: i64,
    pub name: String,
    pub participant_low: i64,
    pub participant_high: i64,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}
