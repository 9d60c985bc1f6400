//! PostgreSQL implementation of UserDirectory

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::User;
use chat_core::traits::{RepoResult, UserDirectory};
use chat_core::value_objects::UserId;

use crate::models::UserModel;

use super::error::map_db_error;

/// Read-only lookups against the `users` table
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT id, nickname
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }
}
