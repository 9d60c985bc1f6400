//! Event bus trait (port) for the publish side of the pub/sub fan-out

use async_trait::async_trait;

use crate::events::FanoutEvent;
use crate::traits::RepoResult;

/// Publish side of the fan-out bus
///
/// Publishing is fire-and-forget: success means the bus accepted the event,
/// not that any subscriber received it. An unreachable bus is reported as
/// `DomainError::BusUnavailable`.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: &FanoutEvent) -> RepoResult<()>;
}
