//! # Middleware Module
//!
//! Middleware intercepts HTTP requests and responses.
//! Each piece can pass a request through, add to the request context and pass
//! it through, or answer early without calling the next layer.
//!
//! ## Our Middleware (outermost first, as composed in `app::build`)
//! - `recover`: turns panics into a 500 and closes the connection
//! - `logging`: access log for every request
//! - `headers`: fixed security headers on every response
//! - (session load/save is `tower-sessions`, plus `recover::save_session_on_panic`)
//! - `csrf`: rejects state-changing requests without the session's token
//! - `auth::authenticate`: resolves the logged-in user into `RequestContext`
//! - `auth::require_authentication`: per-route gate, redirects to login

pub mod auth;
pub mod csrf;
pub mod headers;
pub mod logging;
pub mod recover;
