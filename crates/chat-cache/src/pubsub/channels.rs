//! Pub/Sub channel naming.

use std::fmt;

/// Channel carrying chat fan-out events unless configured otherwise
pub const DEFAULT_CHAT_CHANNEL: &str = "chat_channel";

/// Name of the Redis channel every gateway instance shares
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatChannel(String);

impl ChatChannel {
    /// Create a channel name; blank names fall back to the default channel
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            Self::default()
        } else {
            Self(name)
        }
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for ChatChannel {
    fn default() -> Self {
        Self(DEFAULT_CHAT_CHANNEL.to_string())
    }
}

impl From<&chat_common::RedisConfig> for ChatChannel {
    fn from(config: &chat_common::RedisConfig) -> Self {
        Self::new(config.channel.clone())
    }
}

impl fmt::Display for ChatChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
