//! Message handlers
//!
//! Endpoints for reading and sending room messages.

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::{ChatService, MessageResponse, SendMessageRequest};

use crate::extractors::{AuthUser, RoomIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Messages of a room, oldest first
///
/// GET /chat/rooms/{roomId}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RoomIdPath>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let service = ChatService::new(state.service_context());
    let messages = service.list_messages(auth.user_id, path.room_id()?).await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Persist a message and publish it to connected sockets
///
/// POST /chat/rooms/{roomId}/send
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RoomIdPath>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let room_id = path.room_id()?;
    auth.ensure_is(request.logged_in_user_id)?;

    let service = ChatService::new(state.service_context());
    let message = service
        .send_message(
            room_id,
            auth.user_id,
            &request.message,
            request.logged_in_user_nickname.as_deref(),
        )
        .await?;

    Ok(Created(Json(MessageResponse::from(message))))
}
