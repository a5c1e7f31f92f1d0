//! Panic containment
//!
//! Two pieces cooperate:
//! - [`recover_panic`] sits outermost (through `CatchPanicLayer`) and turns
//!   any panic into a generic 500 that also closes the connection. The
//!   unwind skips the security headers layer, so the 500 gets them here.
//! - [`save_session_on_panic`] sits just inside the session layer. A panic
//!   unwinds straight past `SessionManagerLayer`'s save step, so this layer
//!   saves the session itself before letting the panic continue outward.

use crate::middleware::headers::apply as apply_secure_headers;
use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Response, StatusCode},
    middleware::Next,
    response::Response as AxumResponse,
};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tower_sessions::Session;

/// Response for a recovered panic
pub fn recover_panic(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    tracing::error!("Recovered from panic: {}", panic_message(panic.as_ref()));

    let mut response = Response::new(Body::from("Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    let headers = response.headers_mut();
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    apply_secure_headers(headers);
    response
}

pub async fn save_session_on_panic(session: Session, request: Request, next: Next) -> AxumResponse {
    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            if let Err(e) = session.save().await {
                tracing::error!("Failed to save session after panic: {:?}", e);
            }
            std::panic::resume_unwind(panic)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
