//! Route definitions
//!
//! Chat routes are mounted under /chat; health routes sit at the root.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{favorites, health, messages, rooms};
use crate::state::AppState;

/// Create the chat router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/chat", chat_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(rooms::create_room).get(rooms::list_rooms))
        .route("/rooms/:roomId", get(rooms::get_room))
        .route("/rooms/:roomId/messages", get(messages::list_messages))
        .route("/rooms/:roomId/send", post(messages::send_message))
        .route(
            "/rooms/:roomId/favorite",
            put(favorites::add_favorite).delete(favorites::remove_favorite),
        )
        .route("/favorites", get(favorites::list_favorites))
}
