//! Fan-out event - the payload pushed through the pub/sub bus
//!
//! One event is published per persisted message. It carries no id of its
//! own; every gateway process decides locally which sockets belong to `room`.

use serde::{Deserialize, Serialize};

use crate::entities::Message;
use crate::value_objects::RoomId;

/// Wire payload `{ sender, content, room, read }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanoutEvent {
    /// Display name of the sender
    pub sender: String,
    pub content: String,
    pub room: RoomId,
    #[serde(default)]
    pub read: bool,
}

impl FanoutEvent {
    /// Build the event for a freshly persisted message
    pub fn from_message(message: &Message, sender_name: impl Into<String>) -> Self {
        Self {
            sender: sender_name.into(),
            content: message.content.clone(),
            room: message.room_id,
            read: message.read,
        }
    }

    /// Serialize to the JSON string published on the bus
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a JSON payload received from the bus
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
