//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs, with `From` conversions
//!   from domain entities

pub mod requests;
pub mod responses;

pub use requests::{CreateRoomRequest, SendMessageRequest};
pub use responses::{
    FavoriteRoomResponse, HealthChecks, HealthResponse, MessageResponse, ReadinessResponse,
    RoomCreatedResponse, RoomResponse,
};
