//! # Snippet Handlers
//!
//! Home page listing, viewing a single snippet, and creating snippets.

use crate::context::RequestContext;
use crate::db::snippets;
use crate::error::{AppError, AppResult};
use crate::forms::SnippetCreateForm;
use crate::handlers::{decode_form, pages, template_data};
use crate::session;
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use tower_sessions::Session;

/// Latest snippets
///
/// ## Route
/// GET /
pub async fn home(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    session: Session,
) -> AppResult<Response> {
    let snippets = snippets::latest(&state.db).await?;

    let data = template_data(&ctx, &session).await?.with_snippets(snippets);
    state.templates.render(StatusCode::OK, pages::HOME, &data)
}

/// A single snippet
///
/// ## Route
/// GET /snippet/view/{id}
///
/// Anything that is not a positive integer id is a 404, same as an id that
/// does not exist (or has expired).
pub async fn snippet_view(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = match id.parse::<i64>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(AppError::NotFound(format!("Invalid snippet id {:?}", id))),
    };

    let snippet = snippets::get(&state.db, id).await?;

    let data = template_data(&ctx, &session).await?.with_snippet(snippet);
    state.templates.render(StatusCode::OK, pages::VIEW, &data)
}

/// Empty create form
///
/// ## Route
/// GET /snippet/create (login required)
pub async fn snippet_create(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    session: Session,
) -> AppResult<Response> {
    let data = template_data(&ctx, &session)
        .await?
        .with_form(&SnippetCreateForm::new())?;
    state.templates.render(StatusCode::OK, pages::CREATE, &data)
}

/// Create a snippet
///
/// ## Route
/// POST /snippet/create (login required)
///
/// ## Responses
/// - 303 to the new snippet on success, with a flash message
/// - 422 with the form re-rendered when validation fails; nothing is stored
/// - 400 when the body cannot be decoded
pub async fn snippet_create_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    session: Session,
    form: Result<Form<SnippetCreateForm>, FormRejection>,
) -> AppResult<Response> {
    let mut form = decode_form(form)?;

    if !form.validate() {
        let data = template_data(&ctx, &session).await?.with_form(&form)?;
        return state
            .templates
            .render(StatusCode::UNPROCESSABLE_ENTITY, pages::CREATE, &data);
    }

    let id = snippets::insert(&state.db, &form.title, &form.content, form.expires).await?;
    tracing::info!(snippet_id = id, user_id = ?ctx.user_id, "Snippet created");

    session::put_flash(&session, "Snippet successfully created!").await?;

    Ok(Redirect::to(&format!("/snippet/view/{}", id)).into_response())
}
