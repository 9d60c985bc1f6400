//! Redis Pub/Sub subscriber.
//!
//! Holds a dedicated subscribe-mode connection to the chat channel and
//! re-broadcasts every valid fan-out event to in-process receivers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chat_core::events::FanoutEvent;
use futures_util::StreamExt;
use redis::aio::PubSub;
use redis::Client;
use tokio::sync::{broadcast, mpsc};

use crate::pool::redact_url;
use crate::pubsub::ChatChannel;

/// Error type for subscriber operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to parse event: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Failed to subscribe to {channel}: {source}")]
    Subscribe {
        channel: String,
        #[source]
        source: redis::RedisError,
    },
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Channel to listen on
    pub channel: ChatChannel,
    /// Channel buffer size for broadcast
    pub broadcast_buffer: usize,
    /// Reconnection delay in milliseconds
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            channel: ChatChannel::default(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Commands for subscription management
#[derive(Debug)]
enum SubscriberCommand {
    Unsubscribe,
    Shutdown,
}

/// Outcome of one connected listener session
enum ListenerExit {
    Stop,
    Reconnect,
}

/// Redis Pub/Sub subscriber for the chat channel
///
/// `connect` returns only after the initial SUBSCRIBE is acknowledged, so a
/// failure there surfaces to the caller and can abort startup. Later
/// connection losses are retried in the background.
pub struct ChatSubscriber {
    channel: ChatChannel,
    active: Arc<AtomicBool>,
    /// Broadcast sender for received events
    broadcast_tx: broadcast::Sender<FanoutEvent>,
    /// Control channel for subscription management
    control_tx: mpsc::Sender<SubscriberCommand>,
}

impl std::fmt::Debug for ChatSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSubscriber")
            .field("channel", &self.channel)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl ChatSubscriber {
    /// Subscribe to the chat channel and start the background listener
    pub async fn connect(config: SubscriberConfig) -> SubscriberResult<Self> {
        let pubsub = Self::open(&config).await?;

        tracing::info!(
            url = %redact_url(&config.redis_url),
            channel = %config.channel,
            "Subscribed to chat channel"
        );

        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (control_tx, control_rx) = mpsc::channel(8);
        let active = Arc::new(AtomicBool::new(true));

        tokio::spawn(Self::listener_loop(
            config.clone(),
            pubsub,
            active.clone(),
            broadcast_tx.clone(),
            control_rx,
        ));

        Ok(Self {
            channel: config.channel,
            active,
            broadcast_tx,
            control_tx,
        })
    }

    /// Open a dedicated connection and subscribe to the configured channel
    async fn open(config: &SubscriberConfig) -> SubscriberResult<PubSub> {
        let client = Client::open(config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;
        pubsub
            .subscribe(config.channel.name())
            .await
            .map_err(|source| SubscriberError::Subscribe {
                channel: config.channel.to_string(),
                source,
            })?;
        Ok(pubsub)
    }

    /// Background listener loop
    async fn listener_loop(
        config: SubscriberConfig,
        mut pubsub: PubSub,
        active: Arc<AtomicBool>,
        broadcast_tx: broadcast::Sender<FanoutEvent>,
        mut control_rx: mpsc::Receiver<SubscriberCommand>,
    ) {
        loop {
            match Self::run_listener(&config, &mut pubsub, &broadcast_tx, &mut control_rx).await {
                ListenerExit::Stop => break,
                ListenerExit::Reconnect => {}
            }

            // Reconnect until the channel is subscribed again or we are told to stop
            loop {
                tokio::select! {
                    () = tokio::time::sleep(Duration::from_millis(config.reconnect_delay_ms)) => {}
                    cmd = control_rx.recv() => {
                        tracing::info!(?cmd, "Subscriber stopped while reconnecting");
                        active.store(false, Ordering::SeqCst);
                        return;
                    }
                }

                match Self::open(&config).await {
                    Ok(fresh) => {
                        tracing::info!(channel = %config.channel, "Subscriber reconnected");
                        pubsub = fresh;
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Subscriber reconnect failed, retrying...");
                    }
                }
            }
        }

        active.store(false, Ordering::SeqCst);
        tracing::info!(channel = %config.channel, "Subscriber shutting down");
    }

    /// Forward messages until the stream ends or a command arrives
    async fn run_listener(
        config: &SubscriberConfig,
        pubsub: &mut PubSub,
        broadcast_tx: &broadcast::Sender<FanoutEvent>,
        control_rx: &mut mpsc::Receiver<SubscriberCommand>,
    ) -> ListenerExit {
        let command = {
            let mut stream = pubsub.on_message();

            loop {
                tokio::select! {
                    msg = stream.next() => {
                        let Some(msg) = msg else {
                            tracing::warn!(channel = %config.channel, "Pub/Sub stream ended");
                            return ListenerExit::Reconnect;
                        };

                        let payload: String = match msg.get_payload() {
                            Ok(payload) => payload,
                            Err(e) => {
                                tracing::warn!(error = %e, "Dropping non-text Pub/Sub payload");
                                continue;
                            }
                        };

                        match FanoutEvent::from_json(&payload) {
                            Ok(event) => {
                                tracing::trace!(room = %event.room, "Received fan-out event");
                                // No receivers is fine; nobody is connected here.
                                let _ = broadcast_tx.send(event);
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Dropping malformed fan-out event");
                            }
                        }
                    }

                    cmd = control_rx.recv() => break cmd,
                }
            }
        };

        match command {
            Some(SubscriberCommand::Unsubscribe) => {
                if let Err(e) = pubsub.unsubscribe(config.channel.name()).await {
                    tracing::error!(channel = %config.channel, error = %e, "Failed to unsubscribe");
                } else {
                    tracing::debug!(channel = %config.channel, "Unsubscribed from channel");
                }
                ListenerExit::Stop
            }
            Some(SubscriberCommand::Shutdown) => ListenerExit::Stop,
            None => {
                tracing::warn!("Control channel closed");
                ListenerExit::Stop
            }
        }
    }

    /// Get a receiver for fan-out events
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<FanoutEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Channel this subscriber listens on
    #[must_use]
    pub fn channel(&self) -> &ChatChannel {
        &self.channel
    }

    /// Whether the background listener is still running
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Unsubscribe from the chat channel and stop listening
    pub async fn unsubscribe(&self) -> SubscriberResult<()> {
        self.control_tx
            .send(SubscriberCommand::Unsubscribe)
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }

    /// Shutdown the subscriber
    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.control_tx
            .send(SubscriberCommand::Shutdown)
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }
}

/// Builder for subscriber
#[derive(Debug, Default)]
pub struct SubscriberBuilder {
    config: SubscriberConfig,
}

impl SubscriberBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the shared Redis configuration
    #[must_use]
    pub fn from_config(config: &chat_common::RedisConfig) -> Self {
        Self::new()
            .redis_url(config.url.clone())
            .channel(ChatChannel::from(config))
    }

    /// Set Redis URL
    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    /// Set the channel to listen on
    #[must_use]
    pub fn channel(mut self, channel: ChatChannel) -> Self {
        self.config.channel = channel;
        self
    }

    /// Set broadcast buffer size
    #[must_use]
    pub fn broadcast_buffer(mut self, size: usize) -> Self {
        self.config.broadcast_buffer = size;
        self
    }

    /// Set reconnection delay
    #[must_use]
    pub fn reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.reconnect_delay_ms = delay;
        self
    }

    /// Subscribe and start the listener
    pub async fn connect(self) -> SubscriberResult<ChatSubscriber> {
        ChatSubscriber::connect(self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_config_default() {
        let config = SubscriberConfig::default();
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.channel.name(), "chat_channel");
        assert_eq!(config.broadcast_buffer, 1024);
        assert_eq!(config.reconnect_delay_ms, 1000);
    }

    #[test]
    fn test_subscriber_builder() {
        let builder = SubscriberBuilder::new()
            .redis_url("redis://localhost:6380")
            .channel(ChatChannel::new("other"))
            .broadcast_buffer(2048)
            .reconnect_delay_ms(500);

        assert_eq!(builder.config.redis_url, "redis://localhost:6380");
        assert_eq!(builder.config.channel.name(), "other");
        assert_eq!(builder.config.broadcast_buffer, 2048);
        assert_eq!(builder.config.reconnect_delay_ms, 500);
    }

    #[test]
    fn test_builder_from_redis_config() {
        let redis = chat_common::RedisConfig {
            url: "redis://cache:6379".to_string(),
            max_connections: 4,
            channel: String::new(),
        };
        let builder = SubscriberBuilder::from_config(&redis);
        assert_eq!(builder.config.redis_url, "redis://cache:6379");
        assert_eq!(builder.config.channel, ChatChannel::default());
    }

    #[tokio::test]
    async fn test_connect_fails_when_unreachable() {
        let result = SubscriberBuilder::new()
            .redis_url("redis://127.0.0.1:1")
            .connect()
            .await;
        assert!(result.is_err());
    }
}
