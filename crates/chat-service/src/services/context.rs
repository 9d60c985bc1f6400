//! Service context - dependency container for services
//!
//! Holds the chat stores, the event bus and the JWT service.

use std::sync::Arc;

use chat_cache::{ChatChannel, ChatPublisher, SharedRedisPool};
use chat_common::auth::JwtService;
use chat_core::traits::{
    EventBus, FavoriteRepository, MessageRepository, RoomRepository, UserDirectory,
};
use chat_db::{
    PgFavoriteRepository, PgMessageRepository, PgPool, PgRoomRepository, PgUserDirectory,
};

/// Service context containing all dependencies
///
/// Stores and the bus are trait objects so tests can swap in the in-memory
/// versions. The pools are optional and only consulted by readiness probes.
#[derive(Clone)]
pub struct ServiceContext {
    // Infrastructure handles for health checks
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,

    // Stores
    room_repo: Arc<dyn RoomRepository>,
    message_repo: Arc<dyn MessageRepository>,
    user_directory: Arc<dyn UserDirectory>,
    favorite_repo: Arc<dyn FavoriteRepository>,

    // Pub/Sub
    event_bus: Arc<dyn EventBus>,

    // Services
    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    /// Wire the PostgreSQL stores and the Redis publisher
    pub fn postgres(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        channel: ChatChannel,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        let publisher = ChatPublisher::new((*redis_pool).clone(), channel);

        Self {
            room_repo: Arc::new(PgRoomRepository::new(pool.clone())),
            message_repo: Arc::new(PgMessageRepository::new(pool.clone())),
            user_directory: Arc::new(PgUserDirectory::new(pool.clone())),
            favorite_repo: Arc::new(PgFavoriteRepository::new(pool.clone())),
            event_bus: Arc::new(publisher),
            pool: Some(pool),
            redis_pool: Some(redis_pool),
            jwt_service,
        }
    }

    // === Infrastructure ===

    /// Get the PostgreSQL connection pool, if wired
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Get the Redis connection pool, if wired
    pub fn redis_pool(&self) -> Option<&SharedRedisPool> {
        self.redis_pool.as_ref()
    }

    // === Stores ===

    /// Get the room store
    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    /// Get the message store
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the user directory
    pub fn user_directory(&self) -> &dyn UserDirectory {
        self.user_directory.as_ref()
    }

    /// Get the favorite room store
    pub fn favorite_repo(&self) -> &dyn FavoriteRepository {
        self.favorite_repo.as_ref()
    }

    // === Pub/Sub ===

    /// Get the fan-out publisher
    pub fn event_bus(&self) -> &dyn EventBus {
        self.event_bus.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("redis_pool", &self.redis_pool.as_ref().map(|_| "SharedRedisPool"))
            .field("stores", &"...")
            .field("jwt_service", &self.jwt_service)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    room_repo: Option<Arc<dyn RoomRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    user_directory: Option<Arc<dyn UserDirectory>>,
    favorite_repo: Option<Arc<dyn FavoriteRepository>>,
    event_bus: Option<Arc<dyn EventBus>>,
    jwt_service: Option<Arc<JwtService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn user_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.user_directory = Some(directory);
        self
    }

    pub fn favorite_repo(mut self, repo: Arc<dyn FavoriteRepository>) -> Self {
        self.favorite_repo = Some(repo);
        self
    }

    pub fn event_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::MissingDependency` naming the first absent store
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext {
            pool: self.pool,
            redis_pool: self.redis_pool,
            room_repo: self.room_repo.ok_or(ServiceError::MissingDependency("room_repo"))?,
            message_repo: self.message_repo.ok_or(ServiceError::MissingDependency("message_repo"))?,
            user_directory: self.user_directory.ok_or(ServiceError::MissingDependency("user_directory"))?,
            favorite_repo: self.favorite_repo.ok_or(ServiceError::MissingDependency("favorite_repo"))?,
            event_bus: self.event_bus.ok_or(ServiceError::MissingDependency("event_bus"))?,
            jwt_service: self.jwt_service.ok_or(ServiceError::MissingDependency("jwt_service"))?,
        })
    }
}
