//! Favorite room handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::{FavoriteRoomResponse, FavoriteService};

use crate::extractors::{AuthUser, RoomIdPath};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /chat/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<FavoriteRoomResponse>>> {
    let service = FavoriteService::new(state.service_context());
    let favorites = service.list(auth.user_id).await?;

    Ok(Json(favorites.into_iter().map(FavoriteRoomResponse::from).collect()))
}

/// PUT /chat/rooms/{roomId}/favorite
pub async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RoomIdPath>,
) -> ApiResult<NoContent> {
    let service = FavoriteService::new(state.service_context());
    service.add(auth.user_id, path.room_id()?).await?;
    Ok(NoContent)
}

/// DELETE /chat/rooms/{roomId}/favorite
pub async fn remove_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RoomIdPath>,
) -> ApiResult<NoContent> {
    let service = FavoriteService::new(state.service_context());
    service.remove(auth.user_id, path.room_id()?).await?;
    Ok(NoContent)
}
