//! # Snippetbox
//!
//! A snippet sharing web application: visitors browse and read snippets,
//! registered users log in to create them.
//!
//! The interesting part is the request pipeline every handler runs inside:
//! panic recovery, access logging, security headers, server-side sessions,
//! CSRF protection, and authentication resolution, followed by HTML rendered
//! from a template cache built once at startup.

pub mod app;        // Route table + middleware chain assembly
pub mod config;     // Configuration management (environment variables, settings)
pub mod context;    // Per-request context (CSRF token, authenticated user)
pub mod db;         // Database operations (snippets, users)
pub mod error;      // Error handling and custom error types
pub mod forms;      // Form structs and validation
pub mod handlers;   // HTTP request handlers (routes)
pub mod middleware; // Request/response interceptors
pub mod router;     // Route table with startup-time conflict checks
pub mod session;    // Session keys and helpers
pub mod state;      // Shared application state
pub mod templates;  // Template cache and renderer
