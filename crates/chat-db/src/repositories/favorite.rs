//! PostgreSQL implementation of FavoriteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::FavoriteRoom;
use chat_core::traits::{FavoriteRepository, RepoResult};
use chat_core::value_objects::{RoomId, UserId};

use crate::models::FavoriteRoomModel;

use super::error::{map_db_error, map_room_reference};

/// PostgreSQL implementation of FavoriteRepository
#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    /// Create a new PgFavoriteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    #[instrument(skip(self))]
    async fn add(&self, user_id: UserId, room_id: RoomId) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_favorite_rooms (user_id, room_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, room_id) DO NOTHING
            "#,
        )
        .bind(user_id.into_inner())
        .bind(room_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_room_reference(e, room_id))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, user_id: UserId, room_id: RoomId) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM chat_favorite_rooms
            WHERE user_id = $1 AND room_id = $2
            "#,
        )
        .bind(user_id.into_inner())
        .bind(room_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<FavoriteRoom>> {
        let results = sqlx::query_as::<_, FavoriteRoomModel>(
            r#"
            SELECT user_id, room_id, created_at
            FROM chat_favorite_rooms
            WHERE user_id = $1
            ORDER BY created_at DESC, room_id DESC
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(FavoriteRoom::from).collect())
    }
}
