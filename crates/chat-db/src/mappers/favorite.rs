//! Favorite room model -> entity mapper

use chat_core::entities::FavoriteRoom;
use chat_core::value_objects::{RoomId, UserId};

use crate::models::FavoriteRoomModel;

impl From<FavoriteRoomModel> for FavoriteRoom {
    fn from(model: FavoriteRoomModel) -> Self {
        FavoriteRoom {
            user_id: UserId::new(model.user_id),
            room_id: RoomId::new(model.room_id),
            created_at: model.created_at,
        }
    }
}
