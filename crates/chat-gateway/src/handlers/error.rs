//! Handler error types

use crate::protocol::ServerEvent;
use chat_core::DomainError;
use chat_service::ServiceError;
use std::time::Duration;
use thiserror::Error;

/// Handler error type
///
/// Every variant is reported back to the originating socket as an `error`
/// event; none of them closes the connection.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Event arrived before the connection was bound to a user
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Malformed frame or rule violation detected at the boundary
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Service error
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The store call did not finish in time
    #[error("Event timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The event task panicked or was cancelled
    #[error("Event task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl HandlerError {
    /// Stable code sent in the `error` event
    pub fn code(&self) -> &str {
        match self {
            Self::NotAuthenticated => DomainError::Unauthenticated.code(),
            Self::Domain(e) => e.code(),
            Self::Service(e) => e.error_code(),
            Self::Timeout(_) => "TIMEOUT",
            Self::Task(_) => "INTERNAL_ERROR",
        }
    }

    /// Infrastructure failures are logged at error level
    pub fn is_infrastructure(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_infrastructure(),
            Self::Service(e) => e.status_code() >= 500,
            Self::Timeout(_) | Self::Task(_) => true,
            Self::NotAuthenticated => false,
        }
    }

    /// Build the `error` event for the client
    pub fn to_error_event(&self) -> ServerEvent {
        ServerEvent::error(self.code(), self.to_string())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::RoomId;

    #[test]
    fn test_error_codes() {
        assert_eq!(HandlerError::NotAuthenticated.code(), "UNAUTHENTICATED");
        assert_eq!(
            HandlerError::from(DomainError::InvalidPayload("x".into())).code(),
            "INVALID_PAYLOAD"
        );
        assert_eq!(
            HandlerError::from(ServiceError::from(DomainError::RoomNotFound(RoomId::new(5)))).code(),
            "ROOM_NOT_FOUND"
        );
        assert_eq!(HandlerError::Timeout(Duration::from_secs(10)).code(), "TIMEOUT");
    }

    #[test]
    fn test_infrastructure_classification() {
        assert!(HandlerError::Timeout(Duration::from_secs(1)).is_infrastructure());
        assert!(HandlerError::from(ServiceError::from(DomainError::BusUnavailable("down".into())))
            .is_infrastructure());
        assert!(!HandlerError::from(DomainError::EmptyMessage).is_infrastructure());
    }

    #[test]
    fn test_error_event() {
        let event = HandlerError::Timeout(Duration::from_secs(10)).to_error_event();
        assert_eq!(event, ServerEvent::error("TIMEOUT", "Event timed out after 10s"));
    }
}
