//! PostgreSQL implementation of RoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use chat_core::entities::{NewRoom, Room};
use chat_core::error::DomainError;
use chat_core::traits::{RepoResult, RoomRepository};
use chat_core::value_objects::{ParticipantPair, RoomId, UserId};

use crate::mappers::RoomInsert;
use crate::models::RoomModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RoomRepository
///
/// Rooms are keyed by the normalized `(participant_low, participant_high)`
/// pair, and a unique constraint on it makes `create` safe under concurrency.
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new PgRoomRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT id, name, participant_low, participant_high, created_by, created_at
            FROM chat_rooms
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Room::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_participants(&self, participants: ParticipantPair) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT id, name, participant_low, participant_high, created_by, created_at
            FROM chat_rooms
            WHERE participant_low = $1 AND participant_high = $2
            "#,
        )
        .bind(participants.low().into_inner())
        .bind(participants.high().into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Room::try_from).transpose()
    }

    #[instrument(skip(self), fields(low = %room.participants.low(), high = %room.participants.high()))]
    async fn create(&self, room: &NewRoom) -> RepoResult<Room> {
        if let Some(existing) = self.find_by_participants(room.participants).await? {
            debug!(room_id = %existing.id, "Room already exists for pair");
            return Ok(existing);
        }

        let insert = RoomInsert::new(room);

        // A concurrent create for the same pair makes the insert return no row;
        // the winner's room is then read back.
        let inserted = sqlx::query_as::<_, RoomModel>(
            r#"
            INSERT INTO chat_rooms (name, participant_low, participant_high, created_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (participant_low, participant_high) DO NOTHING
            RETURNING id, name, participant_low, participant_high, created_by, created_at
            "#,
        )
        .bind(insert.name)
        .bind(insert.participant_low)
        .bind(insert.participant_high)
        .bind(insert.created_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match inserted {
            Some(model) => Room::try_from(model),
            None => self.find_by_participants(room.participants).await?.ok_or_else(|| {
                DomainError::DatabaseError("room vanished after insert conflict".to_string())
            }),
        }
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: UserId) -> RepoResult<Vec<Room>> {
        let results = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT id, name, participant_low, participant_high, created_by, created_at
            FROM chat_rooms
            WHERE participant_low = $1 OR participant_high = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Room::try_from).collect()
    }
}
