//! # Error Handling
//!
//! This module defines custom error types for the application and handles
//! converting them into HTTP responses.
//!
//! ## Error categories
//! - **Client input** (`BadRequest`): malformed ids, undecodable forms → 400
//! - **Not found** (`NotFound`): missing snippet or user → 404
//! - **Auth** (`Forbidden`, `InvalidCredentials`): CSRF failures and bad logins
//! - **Internal** (`Database`, `Session`, `Template`, `Password`, `Internal`) → 500
//!
//! Internal errors are logged with full detail but the response body only ever
//! carries the canonical status text, so nothing about the database, the
//! session store or the templates leaks to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-wide error type
///
/// The `#[from]` attributes let the `?` operator convert errors from sqlx,
/// tower-sessions, minijinja and bcrypt into `AppError` automatically.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors (SQLx library errors)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session store errors (loading, saving or renewing the session record)
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template execution errors
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Password hashing errors
    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    /// Resource not found errors (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request errors (400)
    ///
    /// Used when the client sends data we cannot decode at all
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden errors (403)
    ///
    /// Used when a state-changing request fails the CSRF check
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Email/password pair did not match an account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signup with an email address that is already registered
    #[error("Duplicate email")]
    DuplicateEmail,

    /// Internal server errors (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::Template(_)
            | AppError::Password(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError into an HTTP response
///
/// Server errors are logged at `error` level with their debug representation;
/// client errors are logged at `debug` level. In both cases the body is the
/// canonical reason phrase for the status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("{:?}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = status.canonical_reason().unwrap_or("Error");

        (status, body).into_response()
    }
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
