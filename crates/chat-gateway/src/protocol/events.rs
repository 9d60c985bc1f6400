//! Socket event envelope
//!
//! Every frame is `{"event": "<name>", "data": {...}}`. Inbound frames decode
//! into `ClientEvent`, outbound ones are built from `ServerEvent`.

use chat_core::entities::Room;
use chat_core::events::FanoutEvent;
use chat_core::{DomainError, RoomId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Client -> Server
// ============================================================================

/// Events a client may send
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    CreateRoom(CreateRoomPayload),
    SendMessage(SendMessagePayload),
}

/// `createRoom` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    /// Blank means the label is derived from the participants' names
    #[serde(default)]
    pub chatroom_name: String,
    pub participants: Vec<UserId>,
}

/// `sendMessage` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub room_id: RoomId,
    pub content: String,
}

impl ClientEvent {
    /// Decode and shape-check an inbound frame
    ///
    /// Anything that is not a known event with a well-formed payload is an
    /// `InvalidPayload`. Business rules (blank content, unknown rooms) are left
    /// to the service.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let event: Self =
            serde_json::from_str(text).map_err(|e| DomainError::InvalidPayload(e.to_string()))?;
        event.validate()?;
        Ok(event)
    }

    fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::CreateRoom(payload) if payload.participants.is_empty() => Err(
                DomainError::InvalidParticipants("participants must not be empty".to_string()),
            ),
            Self::CreateRoom(payload) if payload.participants.len() > 2 => {
                Err(DomainError::InvalidParticipants(format!(
                    "a room needs exactly two participants, got {}",
                    payload.participants.len()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom(_) => "createRoom",
            Self::SendMessage(_) => "sendMessage",
        }
    }
}

// ============================================================================
// Server -> Client
// ============================================================================

/// Events the server emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    Ready(ReadyPayload),
    RoomCreated(RoomDescriptor),
    NewMessage(FanoutEvent),
    Error(ErrorPayload),
}

/// `ready` payload, sent once after the handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyPayload {
    pub user_id: UserId,
}

/// `roomCreated` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDescriptor {
    pub room_id: RoomId,
    pub chatroom_name: String,
    pub participants: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<&Room> for RoomDescriptor {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id,
            chatroom_name: room.name.clone(),
            participants: room.participants.to_vec(),
            created_at: room.created_at,
        }
    }
}

/// `error` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl ServerEvent {
    pub fn ready(user_id: UserId) -> Self {
        Self::Ready(ReadyPayload { user_id })
    }

    pub fn room_created(room: &Room) -> Self {
        Self::RoomCreated(RoomDescriptor::from(room))
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            code: code.into(),
            message: message.into(),
        })
    }

    /// Serialize to the JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::RoomCreated(_) => "roomCreated",
            Self::NewMessage(_) => "newMessage",
            Self::Error(_) => "error",
        }
    }
}
