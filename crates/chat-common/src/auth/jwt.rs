//! JWT utilities for authentication
//!
//! Tokens are issued by the account subsystem and verified here with the same
//! shared secret, for both the REST API and the WebSocket handshake.

use chat_core::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID), issued either as a string or a number
    #[serde(deserialize_with = "string_or_number")]
    pub sub: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type; tokens without one are treated as access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
    /// Social login provider that authenticated the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Subject {
        Text(String),
        Number(i64),
    }

    Ok(match Subject::deserialize(deserializer)? {
        Subject::Text(s) => s,
        Subject::Number(n) => n.to_string(),
    })
}

impl Claims {
    /// Get the user ID from the subject
    ///
    /// # Errors
    /// Returns an error if the subject is not a numeric user id
    pub fn user_id(&self) -> Result<UserId, AppError> {
        UserId::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Check if this is an access token
    #[must_use]
    pub fn is_access_token(&self) -> bool {
        !matches!(self.token_type, Some(TokenType::Refresh))
    }
}

/// JWT service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and access token lifetime (seconds)
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
        }
    }

    /// Issue an access token for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_access_token(&self, user_id: UserId) -> Result<String, AppError> {
        self.encode_token(user_id, TokenType::Access, self.access_token_expiry)
    }

    /// Issue a token of the given type that expires after `expiry` seconds
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn encode_token(
        &self,
        user_id: UserId,
        token_type: TokenType,
        expiry: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            token_type: Some(token_type),
            provider: None,
            email: None,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate an access token and return the claims
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or a refresh token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if !claims.is_access_token() {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }

    /// Validate an access token and return the authenticated user id
    ///
    /// # Errors
    /// Returns an error if the token is not a valid access token for a numeric subject
    pub fn authenticate(&self, token: &str) -> Result<UserId, AppError> {
        self.validate_access_token(token)?.user_id()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough";

    fn create_test_service() -> JwtService {
        JwtService::new(SECRET, 900)
    }

    #[test]
    fn test_issue_and_authenticate() {
        let service = create_test_service();
        let token = service.issue_access_token(UserId::new(12345)).unwrap();

        assert_eq!(service.authenticate(&token).unwrap(), UserId::new(12345));
    }

    #[test]
    fn test_refresh_token_is_rejected() {
        let service = create_test_service();
        let token = service
            .encode_token(UserId::new(1), TokenType::Refresh, 900)
            .unwrap();

        assert!(matches!(
            service.validate_access_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        // Past the default 60s leeway
        let token = service
            .encode_token(UserId::new(1), TokenType::Access, -3600)
            .unwrap();

        assert!(matches!(service.decode_token(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = create_test_service()
            .issue_access_token(UserId::new(1))
            .unwrap();
        let other = JwtService::new("another-secret-key-also-long", 900);

        assert!(matches!(other.decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();

        let result = service.decode_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_external_claims_with_numeric_subject() {
        #[derive(Serialize)]
        struct ExternalClaims {
            sub: i64,
            provider: &'static str,
            email: &'static str,
            exp: i64,
        }

        let claims = ExternalClaims {
            sub: 77,
            provider: "kakao",
            email: "user@example.com",
            exp: Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let decoded = create_test_service().validate_access_token(&token).unwrap();
        assert_eq!(decoded.user_id().unwrap(), UserId::new(77));
        assert_eq!(decoded.provider.as_deref(), Some("kakao"));
        assert!(decoded.token_type.is_none());
    }

    #[test]
    fn test_claims_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".to_string(),
            iat: 0,
            exp: i64::MAX,
            token_type: Some(TokenType::Access),
            provider: None,
            email: None,
        };

        assert!(matches!(claims.user_id(), Err(AppError::InvalidToken)));
    }
}
