//! Room handlers
//!
//! Endpoints for creating and reading one-to-one rooms.

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::{ChatService, CreateRoomRequest, RoomCreatedResponse, RoomResponse};

use crate::extractors::{AuthUser, RoomIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Create or get the room shared with one other user
///
/// POST /chat/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Json<RoomCreatedResponse>> {
    let service = ChatService::new(state.service_context());
    let room = service
        .create_room(auth.user_id, &request.participants, &request.chatroom_name)
        .await?;

    Ok(Json(RoomCreatedResponse { room_id: room.id }))
}

/// Rooms the authenticated user takes part in
///
/// GET /chat/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<RoomResponse>>> {
    let service = ChatService::new(state.service_context());
    let rooms = service.list_rooms(auth.user_id).await?;

    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// GET /chat/rooms/{roomId}
pub async fn get_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RoomIdPath>,
) -> ApiResult<Json<RoomResponse>> {
    let service = ChatService::new(state.service_context());
    let room = service.get_room(auth.user_id, path.room_id()?).await?;

    Ok(Json(RoomResponse::from(room)))
}
