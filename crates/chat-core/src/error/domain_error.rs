//! Domain errors - error types for the domain layer
//!
//! Every store method returns these so that callers can tell a missing room
//! apart from a broken database connection.

use thiserror::Error;

use crate::value_objects::{RoomId, UserId};

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication / Authorization Errors
    // =========================================================================
    #[error("Authentication required")]
    Unauthenticated,

    #[error("User {user_id} is not a participant of room {room_id}")]
    NotParticipant { room_id: RoomId, user_id: UserId },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Message content must not be empty")]
    EmptyMessage,

    #[error("Message too long: max {max} characters")]
    MessageTooLong { max: usize },

    #[error("Invalid participants: {0}")]
    InvalidParticipants(String),

    #[error("A room needs two different participants")]
    SelfConversation,

    #[error("Recipient not found: {0}")]
    RecipientNotFound(UserId),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Message bus unavailable: {0}")]
    BusUnavailable(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses and socket error events
    pub fn code(&self) -> &'static str {
        match self {
            // Authentication / Authorization
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::NotParticipant { .. } => "NOT_PARTICIPANT",

            // Validation
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            Self::InvalidParticipants(_) => "INVALID_PARTICIPANTS",
            Self::SelfConversation => "SELF_CONVERSATION",
            Self::RecipientNotFound(_) => "RECIPIENT_NOT_FOUND",
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",

            // Not Found
            Self::RoomNotFound(_) => "ROOM_NOT_FOUND",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::BusUnavailable(_) => "BUS_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotParticipant { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyMessage
                | Self::MessageTooLong { .. }
                | Self::InvalidParticipants(_)
                | Self::SelfConversation
                | Self::RecipientNotFound(_)
                | Self::InvalidPayload(_)
        )
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RoomNotFound(_))
    }

    /// Check if this is an infrastructure error
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_)
                | Self::BusUnavailable(_)
                | Self::Timeout(_)
                | Self::InternalError(_)
        )
    }
}
