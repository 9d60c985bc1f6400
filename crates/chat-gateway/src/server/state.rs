//! Gateway state
//!
//! Application state for the gateway server.

use crate::broadcast::{FanoutDispatcher, SocketBroadcast};
use crate::connection::{ConnectionGate, ConnectionManager};
use chat_cache::ChatSubscriber;
use chat_common::GatewayConfig;
use chat_service::ServiceContext;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with stores and the bus publisher
    service_context: Arc<ServiceContext>,
    /// Connection manager for WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Push handle given to handlers
    sockets: Arc<dyn SocketBroadcast>,
    /// Delivers bus events to sockets
    dispatcher: Arc<FanoutDispatcher>,
    /// Handshake token check
    gate: ConnectionGate,
    /// Gateway configuration
    config: Arc<GatewayConfig>,
    /// Dedicated pub/sub connection, absent in tests
    subscriber: Option<Arc<ChatSubscriber>>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        service_context: Arc<ServiceContext>,
        connection_manager: Arc<ConnectionManager>,
        dispatcher: Arc<FanoutDispatcher>,
        gate: ConnectionGate,
        config: GatewayConfig,
    ) -> Self {
        Self {
            service_context,
            sockets: connection_manager.clone(),
            connection_manager,
            dispatcher,
            gate,
            config: Arc::new(config),
            subscriber: None,
        }
    }

    /// Attach the subscriber so shutdown can unsubscribe it
    #[must_use]
    pub fn with_subscriber(mut self, subscriber: Arc<ChatSubscriber>) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the socket push handle
    pub fn sockets(&self) -> &dyn SocketBroadcast {
        self.sockets.as_ref()
    }

    /// Get the fan-out dispatcher
    pub fn dispatcher(&self) -> &FanoutDispatcher {
        &self.dispatcher
    }

    /// Get the handshake gate
    pub fn gate(&self) -> &ConnectionGate {
        &self.gate
    }

    /// Get the gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get the pub/sub subscriber, if attached
    pub fn subscriber(&self) -> Option<&ChatSubscriber> {
        self.subscriber.as_deref()
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
