//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::{Message, NewMessage};
use chat_core::traits::{MessageRepository, RepoResult};
use chat_core::value_objects::RoomId;

use crate::models::MessageModel;

use super::error::{map_db_error, map_room_reference};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(room_id = %message.room_id(), sender_id = %message.sender_id()))]
    async fn save(&self, message: &NewMessage) -> RepoResult<Message> {
        let room_id = message.room_id();

        let model = sqlx::query_as::<_, MessageModel>(
            r#"
            INSERT INTO chat_messages (room_id, sender_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, room_id, sender_id, content, read, created_at
            "#,
        )
        .bind(room_id.into_inner())
        .bind(message.sender_id().into_inner())
        .bind(message.content())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_room_reference(e, room_id))?;

        Ok(Message::from(model))
    }

    #[instrument(skip(self))]
    async fn list_by_room(&self, room_id: RoomId) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, room_id, sender_id, content, read, created_at
            FROM chat_messages
            WHERE room_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(room_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }
}
