//! Gateway server setup
//!
//! Provides the WebSocket server wiring and routes.

mod handler;
mod state;

pub use handler::{chat_socket_handler, HandshakeQuery};
pub use state::GatewayState;

use crate::broadcast::FanoutDispatcher;
use crate::connection::{spawn_sweeper, ConnectionGate, ConnectionManager};
use axum::{routing::get, Router};
use chat_cache::{create_shared_pool, ChatChannel, RedisPoolConfig, SubscriberBuilder};
use chat_common::{AppConfig, AppError, JwtService};
use chat_service::ServiceContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/chat", get(chat_socket_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
///
/// Fails when the initial subscription to the chat channel cannot be made.
pub async fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = chat_db::DatabaseConfig::from(&config.database);
    let pool = chat_db::create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    chat_db::run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    tracing::info!("PostgreSQL connection established");

    tracing::info!("Connecting to Redis...");
    let redis_pool = create_shared_pool(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    let service_context = Arc::new(ServiceContext::postgres(
        pool,
        redis_pool,
        ChatChannel::from(&config.redis),
        jwt_service.clone(),
    ));

    // Separate connection from the publish pool; SUBSCRIBE puts it in a mode
    // where it can do nothing else.
    let subscriber = SubscriberBuilder::from_config(&config.redis)
        .connect()
        .await
        .map_err(|e| AppError::Cache(format!("Failed to subscribe to chat channel: {e}")))?;
    let subscriber = Arc::new(subscriber);
    tracing::info!(channel = %subscriber.channel(), "Redis connection established");

    let connection_manager = ConnectionManager::new_shared();
    spawn_sweeper(connection_manager.clone(), config.gateway.ping_interval());

    let dispatcher = Arc::new(FanoutDispatcher::new(
        connection_manager.clone(),
        service_context.clone(),
        config.gateway.delivery,
    ));
    dispatcher.clone().start(subscriber.receiver());

    Ok(GatewayState::new(
        service_context,
        connection_manager,
        dispatcher,
        ConnectionGate::new(jwt_service),
        config.gateway.clone(),
    )
    .with_subscriber(subscriber))
}

/// Run the gateway server until Ctrl+C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/chat", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
    tracing::info!("Shutdown signal received");
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    let state = create_gateway_state(&config).await?;
    let app = create_app(state.clone());

    let served = run_server(app, addr).await;

    state.dispatcher().stop();
    if let Some(subscriber) = state.subscriber() {
        if let Err(e) = subscriber.unsubscribe().await {
            tracing::warn!(error = %e, "Failed to unsubscribe from chat channel");
        }
    }

    served
}
