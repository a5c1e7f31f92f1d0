//! # Health Check Handler
//!
//! Simple endpoint to check if the server is running.
//! Used by load balancers and monitoring systems.

/// Health check endpoint
///
/// ## Route
/// GET /ping
///
/// ## Response
/// `200 OK` with the body `OK`. The request still passes through the full
/// middleware chain, so a successful ping also means the session store is
/// reachable.
pub async fn ping() -> &'static str {
    "OK"
}
