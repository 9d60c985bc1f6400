//! Gateway state over in-memory stores for unit tests

use crate::broadcast::FanoutDispatcher;
use crate::connection::{Connection, ConnectionGate, ConnectionManager};
use crate::protocol::ServerEvent;
use crate::server::GatewayState;
use chat_common::{DeliveryScope, GatewayConfig, JwtService, ServerConfig};
use chat_core::testing::{
    InMemoryEventBus, InMemoryFavoriteRepository, InMemoryMessageRepository,
    InMemoryRoomRepository, InMemoryUserDirectory,
};
use chat_core::UserId;
use chat_service::ServiceContextBuilder;
use std::sync::Arc;
use tokio::sync::mpsc;

pub(crate) struct Fixture {
    pub state: GatewayState,
    pub messages: Arc<InMemoryMessageRepository>,
    pub bus: Arc<InMemoryEventBus>,
}

pub(crate) fn fixture() -> Fixture {
    fixture_with_timeout(10)
}

pub(crate) fn fixture_with_timeout(event_timeout_secs: u64) -> Fixture {
    let rooms = Arc::new(InMemoryRoomRepository::default());
    let messages = Arc::new(InMemoryMessageRepository::new(rooms.clone()));
    let bus = Arc::new(InMemoryEventBus::default());
    let jwt = Arc::new(JwtService::new("handler-test-secret", 900));

    let services = Arc::new(
        ServiceContextBuilder::new()
            .room_repo(rooms)
            .message_repo(messages.clone())
            .user_directory(Arc::new(InMemoryUserDirectory::with_users(&[
                (1, "ann"),
                (2, "bob"),
            ])))
            .favorite_repo(Arc::new(InMemoryFavoriteRepository::default()))
            .event_bus(bus.clone())
            .jwt_service(jwt.clone())
            .build()
            .unwrap(),
    );

    let manager = ConnectionManager::new_shared();
    let dispatcher = Arc::new(FanoutDispatcher::new(
        manager.clone(),
        services.clone(),
        DeliveryScope::Room,
    ));
    let config = GatewayConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        delivery: DeliveryScope::Room,
        ping_interval_secs: 30,
        event_timeout_secs,
    };

    Fixture {
        state: GatewayState::new(services, manager, dispatcher, ConnectionGate::new(jwt), config),
        messages,
        bus,
    }
}

pub(crate) fn connect(
    state: &GatewayState,
    session: &str,
    user: Option<i64>,
) -> (Arc<Connection>, mpsc::UnboundedReceiver<ServerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let conn = state.connection_manager().add_connection(session.to_string(), tx);
    if let Some(user) = user {
        state
            .connection_manager()
            .authenticate_connection(session, UserId::new(user));
    }
    (conn, rx)
}
