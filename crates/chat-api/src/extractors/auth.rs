//! Authentication extractor
//!
//! Extracts and validates JWT tokens from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chat_core::UserId;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from JWT token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// User ID from the token subject
    pub user_id: UserId,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Reject a body that claims to act for someone else
    pub fn ensure_is(&self, claimed: UserId) -> Result<(), ApiError> {
        if claimed == self.user_id {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, claimed = %claimed, "Body user does not match token");
            Err(ApiError::Service(chat_service::ServiceError::forbidden(
                "loggedInUserId does not match the authenticated user",
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let user_id = app_state
            .jwt_service()
            .authenticate(bearer.token())
            .map_err(|e| {
                if e.is_auth_failure() {
                    tracing::warn!(error = %e, "Rejected access token");
                } else {
                    tracing::error!(error = %e, "Token verification failed");
                }
                ApiError::App(e)
            })?;

        Ok(AuthUser::new(user_id))
    }
}
