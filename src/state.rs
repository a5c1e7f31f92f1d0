//! # Application State
//!
//! This module defines the shared state that's accessible to all request handlers.
//! In Axum, state is how you share resources (database connections, the
//! template cache) across different parts of your application.
//!
//! ## The State Pattern
//! Instead of creating resources for each request, we:
//! 1. Create them once at startup
//! 2. Store them in AppState
//! 3. Share it across all request handlers
//! 4. Axum clones the state for each request (cheap because we use Arc)

use crate::config::Config;
use crate::db;
use crate::handlers::PAGES;
use crate::templates::TemplateCache;
use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

/// Shared application state
///
/// ## Why Clone?
/// Each request handler gets a clone of the state. This is cheap:
/// - `SqlitePool` is already a clone-able pool of connections
/// - `Arc<TemplateCache>` only clones a pointer
///
/// The template cache is never mutated after startup, so no lock is needed.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Compiled template set for every page
    pub templates: Arc<TemplateCache>,
}

impl AppState {
    /// Initialize application state
    ///
    /// This function:
    /// 1. Connects to the SQLite database and runs migrations
    /// 2. Builds the template cache from `UI_DIR/html`
    /// 3. Checks every page a handler renders is in the cache
    ///
    /// # Errors
    /// Returns an error if the database is unreachable, a migration fails, or
    /// any template is missing or fails to compile.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::connect(&config.database_url).await?;
        Self::with_pool(db, config)
    }

    /// State around an existing (already migrated) pool
    pub fn with_pool(db: SqlitePool, config: &Config) -> Result<Self> {
        let templates = TemplateCache::new(&config.template_dir())?;
        templates.ensure_pages(PAGES)?;

        let mut pages: Vec<&str> = templates.pages().collect();
        pages.sort_unstable();
        tracing::info!("Template cache built: {}", pages.join(", "));

        Ok(AppState {
            db,
            templates: Arc::new(templates),
        })
    }
}
