use crate::db::models::User;
use crate::error::{AppError, AppResult};
use chrono::Utc;
use sqlx::SqlitePool;

/// bcrypt work factor for new password hashes
pub const BCRYPT_COST: u32 = 12;

pub async fn insert(pool: &SqlitePool, name: &str, email: &str, password: &str) -> AppResult<()> {
    let hashed_password = hash_password(password).await?;

    sqlx::query(
        "INSERT INTO users (name, email, hashed_password, created)
         VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(email)
    .bind(&hashed_password)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => AppError::DuplicateEmail,
        _ => AppError::Database(e),
    })?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, user_id: i64) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, hashed_password, created FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound(format!("User with id '{}' not found", user_id)),
        _ => AppError::Database(e),
    })?;

    Ok(user)
}

/// Check an email/password pair and return the matching user id
///
/// Unknown emails and wrong passwords both yield `InvalidCredentials`, so the
/// caller cannot tell which one was wrong.
pub async fn authenticate(pool: &SqlitePool, email: &str, password: &str) -> AppResult<i64> {
    let row: Option<(i64, String)> =
        sqlx::query_as("SELECT id, hashed_password FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

    let Some((id, hashed_password)) = row else {
        return Err(AppError::InvalidCredentials);
    };

    if verify_password(password, &hashed_password).await? {
        Ok(id)
    } else {
        Err(AppError::InvalidCredentials)
    }
}

/// Remove an account
///
/// Support helper for tests and maintenance tooling; no route deletes users.
/// Sessions still naming the account are cleared by `middleware::auth::authenticate`.
pub async fn delete(pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

// bcrypt is deliberately slow; keep it off the async worker threads.

async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password(password: &str, hashed_password: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let hashed_password = hashed_password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed_password))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn authenticate_accepts_only_the_right_password() {
        let pool = db::connect_in_memory().await.unwrap();
        insert(&pool, "Alice", "alice@example.com", "pa$$word").await.unwrap();

        let id = authenticate(&pool, "alice@example.com", "pa$$word").await.unwrap();
        let user = get(&pool, id).await.unwrap();
        assert_eq!(user.name, "Alice");
        assert_ne!(user.hashed_password, "pa$$word");

        assert!(matches!(
            authenticate(&pool, "alice@example.com", "wrong-password").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&pool, "nobody@example.com", "pa$$word").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let pool = db::connect_in_memory().await.unwrap();
        insert(&pool, "Alice", "alice@example.com", "pa$$word").await.unwrap();

        let err = insert(&pool, "Alice Again", "alice@example.com", "another1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn deleted_user_is_not_found() {
        let pool = db::connect_in_memory().await.unwrap();
        insert(&pool, "Bob", "bob@example.com", "hunter2hunter2").await.unwrap();
        let id = authenticate(&pool, "bob@example.com", "hunter2hunter2").await.unwrap();

        delete(&pool, id).await.unwrap();

        assert!(matches!(get(&pool, id).await, Err(AppError::NotFound(_))));
    }
}
