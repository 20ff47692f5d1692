//! MySQL persistence and the store abstraction the HTTP layer is written against.
//!
//! - [`repositories`]: zero-sized structs with async queries over `&MySqlPool`.
//! - [`store`]: `async-trait` interfaces with MySQL-backed and in-memory
//!   implementations, so the same handlers run against either.

use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::MySqlPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
