//! JSON body extractor that also runs `validator` rules

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// A body that decoded and passed its `Validate` rules
///
/// Decode failures become `INVALID_PAYLOAD`; rule failures become
/// `VALIDATION_ERROR` with the per-field details.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}
