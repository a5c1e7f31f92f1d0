use crate::context::RequestContext;
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::session;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use tower_sessions::Session;

pub const LOGIN_PATH: &str = "/user/login";

/// Resolve who is making the request
///
/// A user id in the session only counts once the account is confirmed to
/// still exist. If it is gone, the stale id is dropped and the session id
/// renewed before the request continues as anonymous.
pub async fn authenticate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let mut ctx = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    if let Some(user_id) = session::authenticated_user_id(&session).await? {
        match users::get(&state.db, user_id).await {
            Ok(user) => ctx = ctx.authenticated(user.id),
            Err(AppError::NotFound(_)) => {
                tracing::info!(user_id, "Clearing session for deleted user");
                session::log_out(&session).await?;
            }
            Err(e) => return Err(e),
        }
    }

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Gate for routes that need a logged-in user
///
/// Anonymous visitors are redirected to the login page. Pages behind the gate
/// are marked `Cache-Control: no-store` so shared caches never keep them.
pub async fn require_authentication(
    Extension(ctx): Extension<RequestContext>,
    request: Request,
    next: Next,
) -> Response {
    if !ctx.is_authenticated {
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
