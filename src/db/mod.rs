//! # Database Module
//!
//! This module organizes all database-related code into submodules:
//! - `models`: Data structures (Snippet, User)
//! - `snippets`: Queries for snippets
//! - `users`: Queries for user accounts and credential checks
//!
//! Each function takes the pool explicitly and maps `RowNotFound` to
//! `AppError::NotFound` so callers can branch on "missing" without looking at
//! sqlx internals.

pub mod models;
pub mod snippets;
pub mod users;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Connect to the database and bring the schema up to date
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Run the embedded migrations from `./migrations`
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Single-connection in-memory database with the schema applied
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to one connection that never expires.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}
