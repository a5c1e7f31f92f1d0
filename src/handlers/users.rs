//! # User Handlers
//!
//! Signup, login and logout.
//!
//! ## Session state changes
//! - Login cycles the session id and then stores `authenticated_user_id`
//! - Logout cycles the session id and removes `authenticated_user_id`
//!
//! Cycling the id on every privilege change means a session token seen
//! before login (or before logout) is worthless afterwards.

use crate::context::RequestContext;
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::forms::{UserLoginForm, UserSignupForm};
use crate::handlers::{decode_form, pages, template_data};
use crate::session;
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use tower_sessions::Session;

/// ## Route
/// GET /user/signup
pub async fn user_signup(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    session: Session,
) -> AppResult<Response> {
    let data = template_data(&ctx, &session)
        .await?
        .with_form(&UserSignupForm::default())?;
    state.templates.render(StatusCode::OK, pages::SIGNUP, &data)
}

/// ## Route
/// POST /user/signup
///
/// ## Responses
/// - 303 to the login page on success
/// - 422 with field errors, including "already in use" for a taken email
pub async fn user_signup_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    session: Session,
    form: Result<Form<UserSignupForm>, FormRejection>,
) -> AppResult<Response> {
    let mut form = decode_form(form)?;

    if form.validate() {
        match users::insert(&state.db, &form.name, &form.email, &form.password).await {
            Ok(()) => {
                tracing::info!(email = %form.email, "User signed up");
                session::put_flash(&session, "Your signup was successful. Please log in.").await?;
                return Ok(Redirect::to("/user/login").into_response());
            }
            Err(AppError::DuplicateEmail) => {
                form.validator
                    .add_field_error("email", "Email address is already in use");
            }
            Err(e) => return Err(e),
        }
    }

    let data = template_data(&ctx, &session).await?.with_form(&form)?;
    state
        .templates
        .render(StatusCode::UNPROCESSABLE_ENTITY, pages::SIGNUP, &data)
}

/// ## Route
/// GET /user/login
pub async fn user_login(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    session: Session,
) -> AppResult<Response> {
    let data = template_data(&ctx, &session)
        .await?
        .with_form(&UserLoginForm::default())?;
    state.templates.render(StatusCode::OK, pages::LOGIN, &data)
}

/// ## Route
/// POST /user/login
///
/// ## How it works
/// 1. Validate the form (422 on failure)
/// 2. Check the credentials; a mismatch is a generic non-field error
/// 3. Cycle the session id, store the user id
/// 4. Redirect to the create page
pub async fn user_login_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    session: Session,
    form: Result<Form<UserLoginForm>, FormRejection>,
) -> AppResult<Response> {
    let mut form = decode_form(form)?;

    if form.validate() {
        match users::authenticate(&state.db, &form.email, &form.password).await {
            Ok(user_id) => {
                session::log_in(&session, user_id).await?;
                tracing::info!(user_id, "User logged in");
                return Ok(Redirect::to("/snippet/create").into_response());
            }
            Err(AppError::InvalidCredentials) => {
                tracing::debug!(email = %form.email, "Login rejected");
                form.validator
                    .add_non_field_error("Email or password is incorrect");
            }
            Err(e) => return Err(e),
        }
    }

    let data = template_data(&ctx, &session).await?.with_form(&form)?;
    state
        .templates
        .render(StatusCode::UNPROCESSABLE_ENTITY, pages::LOGIN, &data)
}

/// ## Route
/// POST /user/logout (login required)
pub async fn user_logout_post(
    Extension(ctx): Extension<RequestContext>,
    session: Session,
) -> AppResult<Response> {
    session::log_out(&session).await?;
    session::put_flash(&session, "You've been logged out successfully!").await?;
    tracing::info!(user_id = ?ctx.user_id, "User logged out");

    Ok(Redirect::to("/").into_response())
}
