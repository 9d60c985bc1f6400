//! # chat-cache
//!
//! Redis layer for cross-instance chat fan-out.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Publisher implementing the `EventBus` port, and a
//!   subscriber with a dedicated connection that re-broadcasts events
//!   in-process
//!
//! ## Example
//!
//! ```ignore
//! use chat_cache::{ChatChannel, ChatPublisher, RedisPool, RedisPoolConfig, SubscriberBuilder};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = ChatPublisher::new(pool, ChatChannel::default());
//!
//! // Fails fast if the channel cannot be subscribed
//! let subscriber = SubscriberBuilder::new().connect().await?;
//! let mut events = subscriber.receiver();
//!
//! publisher.publish_event(&event).await?;
//! let received = events.recv().await?;
//! ```

pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

// Re-export pubsub types
pub use pubsub::{
    ChatChannel, ChatPublisher, ChatSubscriber, SubscriberBuilder, SubscriberConfig,
    SubscriberError, SubscriberResult, DEFAULT_CHAT_CHANNEL,
};
