//! # HTTP Request Handlers
//!
//! This module contains all the HTTP route handlers.
//!
//! ## Submodules
//! - `health`: `GET /ping`
//! - `snippets`: home page, viewing and creating snippets
//! - `users`: signup, login and logout
//!
//! ## Handler Pattern
//! Handlers are async functions that:
//! 1. Extract what they need (state, session, request context, path, form)
//! 2. Call the database layer
//! 3. Render a page through the template cache or redirect
//!
//! ```rust,ignore
//! pub async fn my_handler(
//!     State(state): State<AppState>,
//!     Extension(ctx): Extension<RequestContext>,
//!     session: Session,
//! ) -> AppResult<Response> {
//!     let data = template_data(&ctx, &session).await?;
//!     state.templates.render(StatusCode::OK, pages::HOME, &data)
//! }
//! ```

pub mod health;
pub mod snippets;
pub mod users;

use crate::context::RequestContext;
use crate::error::{AppError, AppResult};
use crate::session;
use crate::templates::TemplateData;
use axum::extract::rejection::FormRejection;
use axum::Form;
use tower_sessions::Session;

/// Page templates referenced by handlers
pub mod pages {
    pub const HOME: &str = "home.html";
    pub const VIEW: &str = "view.html";
    pub const CREATE: &str = "create.html";
    pub const SIGNUP: &str = "signup.html";
    pub const LOGIN: &str = "login.html";
}

/// Every page a handler may render; checked against the template cache at startup
pub const PAGES: &[&str] = &[pages::HOME, pages::VIEW, pages::CREATE, pages::SIGNUP, pages::LOGIN];

/// Template data with the common fields filled in
///
/// Consumes the flash message, so it shows up on exactly one page. The CSRF
/// token the page embeds is stored in the session here, on first render.
pub async fn template_data(ctx: &RequestContext, session: &Session) -> AppResult<TemplateData> {
    session::store_csrf_token(session, &ctx.csrf_token).await?;
    let flash = session::pop_flash(session).await?;
    Ok(TemplateData::new(ctx, flash))
}

/// Undecodable form bodies are a 400, not axum's default 422
pub fn decode_form<T>(form: Result<Form<T>, FormRejection>) -> AppResult<T> {
    form.map(|Form(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("no route".to_string())
}
