//! # Configuration Management
//!
//! This module handles loading configuration from environment variables.
//! It uses the "12-factor app" methodology where configuration comes from the environment.
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 4000)
//! - `DATABASE_URL`: SQLite database connection string
//! - `UI_DIR`: Directory holding `html/` templates and `static/` assets (default: ./ui)
//! - `SESSION_LIFETIME_HOURS`: Idle lifetime of a session (default: 12)
//! - `SECURE_COOKIES`: Set the `Secure` attribute on the session cookie (default: false)

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Application configuration
///
/// All fields are public so tests can build a `Config` directly without
/// touching the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    /// Examples: "127.0.0.1" (localhost only), "0.0.0.0" (all interfaces)
    pub host: String,

    /// Server port number (1-65535)
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:filename.db?mode=rwc"
    /// The "mode=rwc" means: read, write, create if not exists
    pub database_url: String,

    /// Root of the UI assets
    ///
    /// Expected layout:
    /// ```text
    /// ui/html/base.html
    /// ui/html/partials/*.html
    /// ui/html/pages/*.html
    /// ui/static/...
    /// ```
    pub ui_dir: PathBuf,

    /// How long a session survives without activity
    pub session_lifetime_hours: i64,

    /// Whether the session cookie is only sent over HTTPS
    /// Enable this whenever the server sits behind a TLS terminator.
    pub secure_cookies: bool,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads variables from .env file (if present) using dotenvy
    /// 2. Reads each configuration value from environment
    /// 3. Falls back to sensible defaults if variables aren't set
    /// 4. Returns an error if required parsing fails (e.g., invalid port number)
    ///
    /// ## Example .env file
    /// ```text
    /// HOST=127.0.0.1
    /// PORT=4000
    /// DATABASE_URL=sqlite:snippetbox.db?mode=rwc
    /// UI_DIR=./ui
    /// SESSION_LIFETIME_HOURS=12
    /// SECURE_COOKIES=true
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (dotenvy doesn't error if file missing)
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            // The ? operator propagates parse errors
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:snippetbox.db?mode=rwc".to_string()),

            ui_dir: env::var("UI_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./ui")),

            session_lifetime_hours: env::var("SESSION_LIFETIME_HOURS")
                .unwrap_or_else(|_| "12".to_string())
                .parse()?,

            secure_cookies: env::var("SECURE_COOKIES")
                .unwrap_or_else(|_| "false".to_string())
                .parse()?,
        })
    }

    /// Get the socket address to bind the server to
    ///
    /// Combines host and port into a format suitable for TCP binding.
    /// Example: "127.0.0.1:4000"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directory containing `base.html`, `partials/` and `pages/`
    pub fn template_dir(&self) -> PathBuf {
        self.ui_dir.join("html")
    }

    /// Directory served under `/static/`
    pub fn static_dir(&self) -> PathBuf {
        self.ui_dir.join("static")
    }
}
