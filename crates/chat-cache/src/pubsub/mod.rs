//! Redis Pub/Sub module.
//!
//! One shared channel carries every chat fan-out event. Publishing goes
//! through the pool; subscribing holds its own connection.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{ChatChannel, DEFAULT_CHAT_CHANNEL};
pub use publisher::ChatPublisher;
pub use subscriber::{
    ChatSubscriber, SubscriberBuilder, SubscriberConfig, SubscriberError, SubscriberResult,
};
