//! Business logic services
//!
//! Chat use cases orchestrating the stores and the fan-out bus.

pub mod chat;
pub mod context;
pub mod error;
pub mod favorite;

pub use chat::ChatService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use favorite::FavoriteService;
