//! Path parameter extractors
//!
//! Type-safe extraction of ids from path parameters.

use chat_core::RoomId;

use crate::response::ApiError;

/// Path parameters with roomId
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomIdPath {
    pub room_id: String,
}

impl RoomIdPath {
    /// Parse roomId as a numeric id
    pub fn room_id(&self) -> Result<RoomId, ApiError> {
        RoomId::parse(&self.room_id).map_err(|_| ApiError::invalid_path("Invalid roomId format"))
    }
}
