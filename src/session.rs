//! # Session helpers
//!
//! Sessions are provided by `tower-sessions`: a `SessionManagerLayer` loads the
//! record for the request's cookie and saves it when the response is done.
//! This module names the keys we store and wraps the few operations handlers
//! perform on them.
//!
//! ## Keys
//! - `authenticated_user_id`: set on login, removed on logout
//! - `flash`: one-shot message shown on the next rendered page
//! - `csrf_token`: see `middleware::csrf`

use crate::config::Config;
use crate::error::AppResult;
use sqlx::SqlitePool;
use time::Duration;
use tower_sessions::{cookie::SameSite, Expiry, Session, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::SqliteStore;

pub const AUTHENTICATED_USER_ID: &str = "authenticated_user_id";
pub const FLASH: &str = "flash";
pub const CSRF_TOKEN: &str = "csrf_token";

/// Session store sharing the application's pool, with its table created
pub async fn store(pool: &SqlitePool) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Build the session layer for `store` using the configured cookie policy
///
/// The cookie is `HttpOnly` and `SameSite=Lax`; `Secure` follows the config.
pub fn layer<S: SessionStore + Clone>(store: S, config: &Config) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_secure(config.secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.session_lifetime_hours)))
}

pub async fn authenticated_user_id(session: &Session) -> AppResult<Option<i64>> {
    Ok(session.get(AUTHENTICATED_USER_ID).await?)
}

/// Mark the session as logged in
///
/// The session id is cycled first so a token obtained before login can never
/// carry the authenticated state.
pub async fn log_in(session: &Session, user_id: i64) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(AUTHENTICATED_USER_ID, user_id).await?;
    Ok(())
}

/// Drop the authenticated identity and issue a fresh session id
pub async fn log_out(session: &Session) -> AppResult<()> {
    session.cycle_id().await?;
    session.remove::<i64>(AUTHENTICATED_USER_ID).await?;
    Ok(())
}

/// Persist the request's CSRF token unless the session already holds one
pub async fn store_csrf_token(session: &Session, token: &str) -> AppResult<()> {
    if session.get::<String>(CSRF_TOKEN).await?.is_none() {
        session.insert(CSRF_TOKEN, token).await?;
    }
    Ok(())
}

pub async fn put_flash(session: &Session, message: &str) -> AppResult<()> {
    session.insert(FLASH, message).await?;
    Ok(())
}

/// Read and clear the flash message
pub async fn pop_flash(session: &Session) -> AppResult<Option<String>> {
    Ok(session.remove::<String>(FLASH).await?)
}
