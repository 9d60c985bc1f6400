//! Database models - SQLx-compatible structs for PostgreSQL tables

mod favorite;
mod message;
mod room;
mod user;

pub use favorite::FavoriteRoomModel;
pub use message::MessageModel;
pub use room::RoomModel;
pub use user::UserModel;
