//! Handlers behind the rendered page. Every form post redirects back to `/`,
//! which re-renders from current state.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::view::render_page;

#[derive(Debug, Deserialize)]
pub struct ObjectiveForm {
    #[serde(default)]
    pub objective: String,
    /// Current framework and keyword, mirrored from the generate form.
    pub framework_id: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectionForm {
    #[serde(default)]
    pub framework_id: String,
    #[serde(default)]
    pub keyword: String,
}

async fn apply_selection(state: &AppState, form: SelectionForm) -> Result<(), AppError> {
    let framework_id = Some(form.framework_id).filter(|id| !id.is_empty());
    if let Some(id) = &framework_id {
        if !state.session.contains_framework(id).await {
            return Err(AppError::Validation(format!("Unknown framework '{id}'")));
        }
    }
    state.session.set_selection(framework_id, form.keyword).await;
    Ok(())
}

/// GET /
pub async fn handle_page(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.session.page().await))
}

/// POST /objective
///
/// An empty value is the "All" control. The selection travels with the post
/// and is applied before the filter changes.
pub async fn handle_objective(
    State(state): State<AppState>,
    Form(form): Form<ObjectiveForm>,
) -> Result<Redirect, AppError> {
    if let (Some(framework_id), Some(keyword)) = (form.framework_id, form.keyword) {
        apply_selection(
            &state,
            SelectionForm {
                framework_id,
                keyword,
            },
        )
        .await?;
    }
    state.session.set_objective(Some(form.objective)).await;
    Ok(Redirect::to("/"))
}

/// POST /selection
///
/// Sent in the background whenever the framework or keyword input changes.
pub async fn handle_selection(
    State(state): State<AppState>,
    Form(form): Form<SelectionForm>,
) -> Result<StatusCode, AppError> {
    apply_selection(&state, form).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /generate
///
/// Validation happens before the redirect so a rejection shows on the next
/// render; the accepted request then streams in the background.
pub async fn handle_generate(
    State(state): State<AppState>,
    Form(form): Form<SelectionForm>,
) -> Result<Redirect, AppError> {
    apply_selection(&state, form).await?;

    if let Some(request) = state.session.begin_generation().await {
        let session = state.session.clone();
        tokio::spawn(async move { session.run_generation(request).await });
    }

    Ok(Redirect::to("/"))
}

/// POST /reload
///
/// Refetches the feed and replaces the record set wholesale.
pub async fn handle_reload(State(state): State<AppState>) -> Redirect {
    info!("Reloading framework feed");
    let result = state.loader.load().await;
    state.session.apply_feed(result).await;
    Redirect::to("/")
}
