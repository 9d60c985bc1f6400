//! Errors returned by the chat use cases

use chat_common::{domain_status_code, AppError};
use chat_core::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Business rule or store failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    App(#[from] AppError),

    /// Authenticated, but acting on behalf of someone else
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Wiring mistake caught when the context is built
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),
}

impl ServiceError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// The domain error behind this one, looking through `AppError`
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::App(AppError::Domain(e)) => Some(e),
            _ => None,
        }
    }

    /// HTTP status for the REST surface
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status_code(e),
            Self::App(e) => e.status_code(),
            Self::Forbidden(_) => 403,
            Self::MissingDependency(_) => 500,
        }
    }

    /// Stable code shared by REST error bodies and socket `error` events
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Forbidden(_) => "FORBIDDEN",
            Self::MissingDependency(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ServiceError::MissingDependency(name) => {
                AppError::Config(format!("service context is missing {name}"))
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
