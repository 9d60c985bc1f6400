//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output with camelCase
//! field names. Ids are plain numbers.

use chat_core::entities::{FavoriteRoom, Message, Room};
use chat_core::{MessageId, RoomId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Room Responses
// ============================================================================

/// Reply to a room creation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedResponse {
    pub room_id: RoomId,
}

/// Room descriptor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: RoomId,
    pub chatroom_name: String,
    pub participants: Vec<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id,
            chatroom_name: room.name.clone(),
            participants: room.participants.to_vec(),
            created_by: room.created_by,
            created_at: room.created_at,
        }
    }
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self::from(&room)
    }
}

/// Favorite room entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRoomResponse {
    pub room_id: RoomId,
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteRoom> for FavoriteRoomResponse {
    fn from(favorite: FavoriteRoom) -> Self {
        Self {
            room_id: favorite.room_id,
            created_at: favorite.created_at,
        }
    }
}

// ============================================================================
// Message Responses
// ============================================================================

/// Persisted message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            content: message.content,
            read: message.read,
            created_at: message.created_at,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
