//! Domain entities - core business objects

mod favorite;
mod message;
mod room;
mod user;

pub use favorite::FavoriteRoom;
pub use message::{Message, NewMessage};
pub use room::{derive_room_name, NewRoom, Room};
pub use user::User;
