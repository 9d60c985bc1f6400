//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in chat-core.

mod error;
mod favorite;
mod message;
mod room;
mod user;

pub use favorite::PgFavoriteRepository;
pub use message::PgMessageRepository;
pub use room::PgRoomRepository;
pub use user::PgUserDirectory;
