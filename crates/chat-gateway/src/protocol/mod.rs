//! Gateway protocol definitions
//!
//! Defines the socket event envelope and the close codes.

mod close_codes;
mod events;

pub use close_codes::CloseCode;
pub use events::{
    ClientEvent, CreateRoomPayload, ErrorPayload, ReadyPayload, RoomDescriptor, SendMessagePayload,
    ServerEvent,
};
