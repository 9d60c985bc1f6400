//! # chat-core
//!
//! Domain layer containing entities, value objects, store traits, and the fan-out event.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types at crate root
pub use entities::{derive_room_name, FavoriteRoom, Message, NewMessage, NewRoom, Room, User};
pub use error::DomainError;
pub use events::FanoutEvent;
pub use traits::{
    EventBus, FavoriteRepository, MessageRepository, RepoResult, RoomRepository, UserDirectory,
};
pub use value_objects::{IdParseError, MessageId, ParticipantPair, RoomId, UserId};
