//! # chat-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService, TokenType};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DeliveryScope, Environment,
    GatewayConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
};
pub use error::{domain_status_code, AppError, AppResult};
pub use telemetry::{
    init_tracing, init_tracing_for, init_tracing_with_config, try_init_tracing,
    try_init_tracing_with_config, TracingConfig, TracingError,
};
