//! # Database Models
//!
//! This module defines the data structures that map to database tables.
//! These structs represent rows in the database and derive `Serialize` so the
//! template engine can read them directly.
//!
//! ## Timestamps
//! Timestamps are `DateTime<Utc>`; sqlx stores them as text in SQLite and
//! serde renders them as RFC 3339 strings, which is the format the
//! `human_date` template filter expects.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shared snippet of text
///
/// ## Derive Macros Explained
/// - `Serialize`: exposes the snippet to templates
/// - `sqlx::FromRow`: maps database rows to this struct
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Snippet {
    /// Auto-incremented primary key
    pub id: i64,

    /// Short title, at most 100 characters
    pub title: String,

    /// Snippet body, rendered verbatim (escaped) in a `<pre>` block
    pub content: String,

    /// When the snippet was created
    pub created: DateTime<Utc>,

    /// When the snippet stops being visible
    /// Expired snippets are never returned by the queries in `db::snippets`.
    pub expires: DateTime<Utc>,
}

/// User account information
///
/// The password hash is never serialized; templates only ever see the
/// public fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Auto-incremented primary key
    /// Stored in the session as `authenticated_user_id` after login
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unique email address, used for login
    pub email: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub hashed_password: String,

    /// When the account was created
    pub created: DateTime<Utc>,
}
