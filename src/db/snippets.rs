use crate::db::models::Snippet;
use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

/// How many snippets the home page lists
pub const LATEST_LIMIT: i64 = 10;

pub async fn insert(pool: &SqlitePool, title: &str, content: &str, expires_days: i64) -> AppResult<i64> {
    let created = Utc::now();
    let expires = created + Duration::days(expires_days);

    let result = sqlx::query(
        "INSERT INTO snippets (title, content, created, expires)
         VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(content)
    .bind(created)
    .bind(expires)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get(pool: &SqlitePool, id: i64) -> AppResult<Snippet> {
    let snippet = sqlx::query_as::<_, Snippet>(
        "SELECT id, title, content, created, expires FROM snippets
         WHERE expires > ? AND id = ?",
    )
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound(format!("Snippet {} not found", id)),
        _ => AppError::Database(e),
    })?;

    Ok(snippet)
}

/// Most recently created unexpired snippets, newest first
pub async fn latest(pool: &SqlitePool) -> AppResult<Vec<Snippet>> {
    let snippets = sqlx::query_as::<_, Snippet>(
        "SELECT id, title, content, created, expires FROM snippets
         WHERE expires > ?
         ORDER BY id DESC
         LIMIT ?",
    )
    .bind(Utc::now())
    .bind(LATEST_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(snippets)
}

/// Number of stored snippets, expired ones included
///
/// Support helper for tests and maintenance tooling; no route uses it.
pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM snippets")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
