//! # chat-service
//!
//! Application layer containing the chat use cases, the dependency
//! container and the request/response DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    CreateRoomRequest, FavoriteRoomResponse, HealthChecks, HealthResponse, MessageResponse,
    ReadinessResponse, RoomCreatedResponse, RoomResponse, SendMessageRequest,
};
pub use services::{
    ChatService, FavoriteService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
