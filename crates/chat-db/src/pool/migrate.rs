//! Embedded schema setup

use sqlx::PgPool;
use tracing::info;

const CHAT_SCHEMA: &str = include_str!("../../migrations/0001_chat.sql");

/// Apply the chat schema
///
/// Statements are idempotent, so this is safe to call on every startup and
/// from several processes.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(CHAT_SCHEMA).execute(pool).await?;
    info!("Chat schema is up to date");
    Ok(())
}
