//! Redis Pub/Sub publisher.
//!
//! Publishes fan-out events for distribution to every gateway instance.

use async_trait::async_trait;
use chat_core::error::DomainError;
use chat_core::events::FanoutEvent;
use chat_core::traits::{EventBus, RepoResult};
use redis::AsyncCommands;

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::ChatChannel;

/// Redis Pub/Sub publisher
///
/// Uses pooled connections, never the subscriber's dedicated one.
#[derive(Clone)]
pub struct ChatPublisher {
    pool: RedisPool,
    channel: ChatChannel,
}

impl std::fmt::Debug for ChatPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatPublisher")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl ChatPublisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool, channel: ChatChannel) -> Self {
        Self { pool, channel }
    }

    /// Channel this publisher writes to
    #[must_use]
    pub fn channel(&self) -> &ChatChannel {
        &self.channel
    }

    /// Publish an event, returning the number of subscribers that got it
    pub async fn publish_event(&self, event: &FanoutEvent) -> RedisResult<u32> {
        let payload = event.to_json()?;
        self.publish_raw(&payload).await
    }

    /// Publish a raw payload to the chat channel
    pub async fn publish_raw(&self, payload: &str) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;

        let receivers: u32 = conn.publish(self.channel.name(), payload).await?;

        tracing::debug!(
            channel = %self.channel,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }
}

#[async_trait]
impl EventBus for ChatPublisher {
    async fn publish(&self, event: &FanoutEvent) -> RepoResult<()> {
        self.publish_event(event).await.map(|_| ()).map_err(|e| {
            tracing::error!(channel = %self.channel, room = %event.room, error = %e, "Publish failed");
            DomainError::BusUnavailable(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RedisPoolConfig;

    #[test]
    fn test_publisher_is_event_bus() {
        fn assert_bus<T: EventBus + Clone + 'static>() {}
        assert_bus::<ChatPublisher>();
    }

    #[tokio::test]
    async fn test_publish_unreachable_is_bus_unavailable() {
        // Nothing listens on port 1, so acquiring a connection fails.
        let pool = RedisPool::new(
            RedisPoolConfig::new("redis://127.0.0.1:1", 1)
                .acquire_timeout(std::time::Duration::from_millis(200)),
        )
        .unwrap();
        let publisher = ChatPublisher::new(pool, ChatChannel::default());
        let event = FanoutEvent {
            sender: "ann".to_string(),
            content: "hi".to_string(),
            room: chat_core::RoomId::new(1),
            read: false,
        };

        let result = publisher.publish(&event).await;
        assert!(matches!(result, Err(DomainError::BusUnavailable(_))));
    }
}
