//! Ports implemented by the infrastructure crates

mod bus;
mod repositories;

pub use bus::EventBus;
pub use repositories::{
    FavoriteRepository, MessageRepository, RepoResult, RoomRepository, UserDirectory,
};
