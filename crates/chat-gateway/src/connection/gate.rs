//! Handshake token gate
//!
//! Verifies the access token presented on the WebSocket upgrade request
//! before any socket is created.

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::headers::{authorization::Bearer, Authorization, Cookie, HeaderMapExt};
use chat_common::{AppError, JwtService};
use chat_core::UserId;

/// Cookie carrying the access token for browser clients
pub const TOKEN_COOKIE: &str = "accessToken";

/// Where the handshake token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Query,
    Header,
    Cookie,
}

impl TokenSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handshake refusal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Missing access token")]
    MissingToken,

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Access token expired")]
    TokenExpired,
}

impl GateError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_AUTH",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
        }
    }
}

impl From<AppError> for GateError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::TokenExpired => Self::TokenExpired,
            _ => Self::InvalidToken,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Verifies handshake tokens with the shared JWT secret
#[derive(Clone)]
pub struct ConnectionGate {
    jwt: Arc<JwtService>,
}

impl ConnectionGate {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }

    /// Find the token, trying query, then bearer header, then cookie
    pub fn extract_token(
        query_token: Option<&str>,
        headers: &HeaderMap,
    ) -> Option<(String, TokenSource)> {
        if let Some(token) = query_token.map(str::trim).filter(|t| !t.is_empty()) {
            return Some((token.to_string(), TokenSource::Query));
        }

        if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
            return Some((bearer.token().to_string(), TokenSource::Header));
        }

        headers
            .typed_get::<Cookie>()
            .and_then(|cookie| cookie.get(TOKEN_COOKIE).map(str::to_string))
            .filter(|t| !t.is_empty())
            .map(|token| (token, TokenSource::Cookie))
    }

    /// Admit or refuse a handshake
    pub fn admit(&self, query_token: Option<&str>, headers: &HeaderMap) -> Result<UserId, GateError> {
        let Some((token, source)) = Self::extract_token(query_token, headers) else {
            tracing::warn!("Handshake refused: no access token");
            return Err(GateError::MissingToken);
        };

        match self.jwt.authenticate(&token) {
            Ok(user_id) => {
                tracing::info!(user_id = %user_id, source = %source, "Handshake authenticated");
                Ok(user_id)
            }
            Err(e) => {
                let err = GateError::from(e);
                tracing::warn!(source = %source, reason = %err, "Handshake refused");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for ConnectionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGate").finish_non_exhaustive()
    }
}
