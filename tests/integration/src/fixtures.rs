//! Test fixtures and data generators

use std::sync::atomic::{AtomicI64, Ordering};

use chat_db::PgPool;
use serde::{Deserialize, Serialize};

/// Counter for unique user ids within one test binary
static COUNTER: AtomicI64 = AtomicI64::new(0);

/// A user id no other test run is likely to have used
pub fn unique_user_id() -> i64 {
    // Microsecond clock keeps concurrent runs against one database apart
    let base = chrono::Utc::now().timestamp_micros() * 100;
    base + COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Insert a directory entry for a user
pub async fn seed_user(pool: &PgPool, nickname: &str) -> anyhow::Result<i64> {
    let id = unique_user_id();
    sqlx::query("INSERT INTO users (id, nickname) VALUES ($1, $2)")
        .bind(id)
        .bind(nickname)
        .execute(pool)
        .await?;
    Ok(id)
}

/// Body of `POST /chat/rooms`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomBody {
    pub participants: Vec<i64>,
    pub chatroom_name: String,
}

impl CreateRoomBody {
    pub fn with(recipient: i64) -> Self {
        Self {
            participants: vec![recipient],
            chatroom_name: String::new(),
        }
    }
}

/// Body of `POST /chat/rooms/{roomId}/send`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    pub logged_in_user_id: i64,
    pub logged_in_user_nickname: Option<String>,
    pub message: String,
}

impl SendMessageBody {
    pub fn new(user_id: i64, message: impl Into<String>) -> Self {
        Self {
            logged_in_user_id: user_id,
            logged_in_user_nickname: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreated {
    pub room_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBody {
    pub room_id: i64,
    pub chatroom_name: String,
    pub participants: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub read: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBody {
    pub room_id: i64,
}

/// Error envelope returned by the REST API
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
