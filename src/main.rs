//! # Snippetbox Server
//!
//! Entry point: sets up logging, loads configuration, builds the shared state
//! and the middleware chain, then serves HTTP until the process is stopped.

use snippetbox::{app, config::Config, session, state::AppState};
use std::net::SocketAddr;
use tower_sessions::session_store::ExpiredDeletion;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main application entry point
///
/// This function:
/// 1. Sets up logging
/// 2. Loads configuration from environment variables
/// 3. Connects to the database and builds the template cache
/// 4. Starts a background task to delete expired sessions
/// 5. Builds the routes and middleware chain
/// 6. Starts the HTTP server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG wins; otherwise info everywhere and debug for snippetbox itself
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,snippetbox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded: {:?}", config);

    // Database pool + template cache; any missing or broken template stops us here
    let app_state = AppState::new(&config).await?;
    tracing::info!("Application state initialized");

    // Sessions live in the same SQLite database as the application data
    let session_store = session::store(&app_state.db).await?;

    // Expired sessions are never loaded, but they still take up rows
    let deletion_store = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = deletion_store
            .continuously_delete_expired(tokio::time::Duration::from_secs(60))
            .await
        {
            tracing::error!("Session cleanup failed: {:?}", e);
        }
    });

    // Route conflicts are reported here, before we accept a single connection
    let app = app::build(app_state, &config, session_store)?;

    let bind_addr = config.bind_address();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
