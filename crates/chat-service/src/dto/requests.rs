//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names follow the camelCase wire format used by chat clients.

use chat_core::UserId;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Room Requests
// ============================================================================

/// Create (or get) the one-to-one room for a participant pair
///
/// The requester is added to `participants` when absent.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 2, message = "Participants must list 1-2 user ids"))]
    pub participants: Vec<UserId>,

    /// Empty means the label is derived from the participants' names
    #[serde(default)]
    #[validate(length(max = 100, message = "Room name must be at most 100 characters"))]
    pub chatroom_name: String,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send a message through the REST path
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Must match the authenticated user
    pub logged_in_user_id: UserId,

    /// Display name used when the directory has none
    #[serde(default)]
    #[validate(length(max = 64, message = "Nickname must be at most 64 characters"))]
    pub logged_in_user_nickname: Option<String>,

    /// Content; blank or oversized content is rejected by the message rules
    pub message: String,
}
