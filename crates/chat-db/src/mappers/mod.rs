//! Entity to model mappers
//!
//! Conversions between domain entities (chat-core) and database models.
//! - `From<Model> for Entity` / `TryFrom`: convert rows to domain objects
//! - `*Insert` structs: prepare entity data for database writes

mod favorite;
mod message;
mod room;
mod user;

pub use room::RoomInsert;
