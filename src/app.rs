//! # Application assembly
//!
//! Builds the route table and wraps it in the middleware chain. The order of
//! the chain is fixed (outermost first):
//!
//! 1. panic recovery
//! 2. request logging
//! 3. security headers
//! 4. session load/save (plus the save-on-panic guard)
//! 5. CSRF guard
//! 6. authentication resolution
//!
//! The login gate is not part of the global chain; it is attached per route by
//! `RouteTable::protected`.

use crate::config::Config;
use crate::handlers::{self, health, snippets, users};
use crate::middleware::{
    auth::authenticate, csrf::verify_csrf_token, headers::secure_headers,
    logging::request_logging, recover,
};
use crate::router::{RouteError, RouteTable};
use crate::session;
use crate::state::AppState;
use axum::{http::Method, middleware, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_sessions_sqlx_store::SqliteStore;

/// Every route the application serves
pub fn routes(config: &Config) -> Result<RouteTable<AppState>, RouteError> {
    let table = RouteTable::new()
        .static_files("/static", config.static_dir())?
        .route(Method::GET, "/ping", health::ping)?
        .route(Method::GET, "/", snippets::home)?
        .route(Method::GET, "/snippet/view/{id}", snippets::snippet_view)?
        .protected(Method::GET, "/snippet/create", snippets::snippet_create)?
        .protected(Method::POST, "/snippet/create", snippets::snippet_create_post)?
        .route(Method::GET, "/user/signup", users::user_signup)?
        .route(Method::POST, "/user/signup", users::user_signup_post)?
        .route(Method::GET, "/user/login", users::user_login)?
        .route(Method::POST, "/user/login", users::user_login_post)?
        .protected(Method::POST, "/user/logout", users::user_logout_post)?
        .not_found(handlers::not_found);

    Ok(table)
}

/// The complete application: routes wrapped in the middleware chain
pub fn build(state: AppState, config: &Config, session_store: SqliteStore) -> Result<Router, RouteError> {
    let table = routes(config)?;
    Ok(with_middleware(table, state, config, session_store))
}

/// Wrap `table` in the middleware chain and attach the state
fn with_middleware(
    table: RouteTable<AppState>,
    state: AppState,
    config: &Config,
    session_store: SqliteStore,
) -> Router {
    // ServiceBuilder applies layers top to bottom: the first one is outermost.
    let chain = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(recover::recover_panic))
        .layer(request_logging())
        .layer(middleware::from_fn(secure_headers))
        .layer(session::layer(session_store, config))
        .layer(middleware::from_fn(recover::save_session_on_panic))
        .layer(middleware::from_fn(verify_csrf_token))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    table.into_router().layer(chain).with_state(state)
}
