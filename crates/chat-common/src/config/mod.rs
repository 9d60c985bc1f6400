//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DeliveryScope, Environment,
    GatewayConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
};
