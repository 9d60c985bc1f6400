//! Favorite room service

use chat_core::entities::FavoriteRoom;
use chat_core::{DomainError, RoomId, UserId};
use tracing::{info, instrument};

use super::chat::ensure_participant;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Favorite room service
pub struct FavoriteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FavoriteService<'a> {
    /// Create a new FavoriteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mark a room as favorite; only participants may do so
    #[instrument(skip(self))]
    pub async fn add(&self, user_id: UserId, room_id: RoomId) -> ServiceResult<()> {
        let room = self
            .ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;
        ensure_participant(&room, user_id)?;

        self.ctx.favorite_repo().add(user_id, room_id).await?;
        info!(user_id = %user_id, room_id = %room_id, "Room marked as favorite");
        Ok(())
    }

    /// Remove a favorite mark; removing an absent mark is not an error
    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: UserId, room_id: RoomId) -> ServiceResult<()> {
        self.ctx.favorite_repo().remove(user_id, room_id).await?;
        Ok(())
    }

    /// List favorites of a user, most recent first
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: UserId) -> ServiceResult<Vec<FavoriteRoom>> {
        Ok(self.ctx.favorite_repo().list_for_user(user_id).await?)
    }
}
