//! Error handling utilities for repositories

use chat_core::error::DomainError;
use chat_core::value_objects::RoomId;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// A foreign key violation on a room reference means the room is gone
pub fn map_room_reference(e: SqlxError, room_id: RoomId) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return room_not_found(room_id);
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "room not found" error
pub fn room_not_found(id: RoomId) -> DomainError {
    DomainError::RoomNotFound(id)
}
