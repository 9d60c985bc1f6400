//! Errors shared by the REST API and the gateway binaries
//!
//! Wraps `DomainError` and adds the token, startup and infrastructure
//! failures that live outside the domain.

use chat_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authentication")]
    MissingAuth,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Pool creation, migrations
    #[error("Database error: {0}")]
    Database(String),

    /// Redis pool or initial subscription
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken | Self::TokenExpired | Self::MissingAuth => 401,
            Self::Forbidden(_) => 403,
            Self::Database(_) | Self::Cache(_) | Self::Config(_) | Self::Internal(_) => 500,
            Self::Domain(e) => domain_status_code(e),
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::MissingAuth => "MISSING_AUTH",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Token problems the caller can fix by signing in again
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::TokenExpired | Self::MissingAuth)
    }
}

/// HTTP status for a domain error
///
/// A missing recipient is a 400, not a 404: the request named someone who
/// cannot take part in a room.
#[must_use]
pub fn domain_status_code(err: &DomainError) -> u16 {
    if err.is_authentication() {
        401
    } else if err.is_authorization() {
        403
    } else if err.is_validation() {
        400
    } else if err.is_not_found() {
        404
    } else {
        match err {
            DomainError::BusUnavailable(_) => 503,
            DomainError::Timeout(_) => 504,
            _ => 500,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
