//! # chat-db
//!
//! Database layer implementing the chat store traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migration
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations for rooms, messages, users and favorites
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_db::{create_pool, run_migrations, DatabaseConfig, PgRoomRepository};
//! use chat_core::traits::RoomRepository;
//!
//! async fn example(url: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig { url: url.to_string(), ..Default::default() };
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let rooms = PgRoomRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgFavoriteRepository, PgMessageRepository, PgRoomRepository, PgUserDirectory,
};
