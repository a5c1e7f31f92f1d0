//! CSRF guard
//!
//! Each session gets one random token, stored under `csrf_token`. Pages embed
//! it in their forms; every request with an unsafe method must send it back,
//! either as the `csrf_token` form field or in the `X-CSRF-Token` header.
//! Requests that fail the check never reach the handler.
//!
//! The guard itself never writes the session. A request without a stored
//! token gets a fresh candidate in its `RequestContext`, and the token is
//! persisted only when a page embedding it is rendered
//! (`session::store_csrf_token`). Health checks and static assets therefore
//! never create session records.

use crate::context::RequestContext;
use crate::error::{AppError, AppResult};
use crate::session::CSRF_TOKEN;
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tower_sessions::Session;

pub const CSRF_FORM_FIELD: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Largest request body buffered while looking for the form field
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub async fn verify_csrf_token(session: Session, request: Request, next: Next) -> AppResult<Response> {
    let stored = session.get::<String>(CSRF_TOKEN).await?;

    let mut request = if is_safe(request.method()) {
        request
    } else {
        // No stored token means nothing can match
        check_request(request, stored.as_deref().unwrap_or_default()).await?
    };

    let token = stored.unwrap_or_else(generate_token);
    request
        .extensions_mut()
        .insert(RequestContext::anonymous(token));

    Ok(next.run(request).await)
}

pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}

/// Verify an unsafe request and hand it back with its body intact
async fn check_request(request: Request, expected: &str) -> AppResult<Request> {
    let (parts, body) = request.into_parts();

    if is_cross_site(&parts.headers) {
        tracing::warn!(method = %parts.method, uri = %parts.uri, "Rejected cross-site request");
        return Err(AppError::Forbidden("cross-site request".to_string()));
    }

    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Unreadable request body: {}", e)))?;

    let submitted = header_token(&parts.headers).or_else(|| {
        if is_form(&parts.headers) {
            form_token(&bytes)
        } else {
            None
        }
    });

    match submitted {
        Some(token) if tokens_match(&token, expected) => {
            Ok(Request::from_parts(parts, Body::from(bytes)))
        }
        Some(_) => {
            tracing::warn!(method = %parts.method, uri = %parts.uri, "CSRF token mismatch");
            Err(AppError::Forbidden("CSRF token mismatch".to_string()))
        }
        None => {
            tracing::warn!(method = %parts.method, uri = %parts.uri, "CSRF token missing");
            Err(AppError::Forbidden("CSRF token missing".to_string()))
        }
    }
}

fn is_cross_site(headers: &HeaderMap) -> bool {
    headers
        .get("sec-fetch-site")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("cross-site"))
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

fn header_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn form_token(body: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned())
}

/// Compare without short-circuiting on the first differing byte
fn tokens_match(submitted: &str, expected: &str) -> bool {
    let (a, b) = (submitted.as_bytes(), expected.as_bytes());
    if a.len() != b.len() || b.is_empty() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
