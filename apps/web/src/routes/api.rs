//! JSON and SSE views of the form state.

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{unfold, Stream};
use serde::Deserialize;

use crate::errors::AppError;
use crate::form::OutputSnapshot;
use crate::models::framework::FrameworkRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ObjectiveQuery {
    pub objective: Option<String>,
}

/// GET /api/objectives
pub async fn handle_objectives(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.session.objectives().await)
}

/// GET /api/frameworks?objective=
pub async fn handle_frameworks(
    State(state): State<AppState>,
    Query(params): Query<ObjectiveQuery>,
) -> Json<Vec<FrameworkRecord>> {
    let objective = params.objective.filter(|o| !o.trim().is_empty());
    Json(state.session.frameworks(objective.as_deref()).await)
}

/// GET /api/frameworks/:id
pub async fn handle_framework(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FrameworkRecord>, AppError> {
    state
        .session
        .framework(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Framework {id} not found")))
}

/// GET /api/output
pub async fn handle_output(State(state): State<AppState>) -> Json<OutputSnapshot> {
    Json(state.session.snapshot().await)
}

/// GET /api/output/events
///
/// Emits the current snapshot, then one `output` event per published change.
pub async fn handle_output_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.session.subscribe();
    let stream = unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        let data = serde_json::to_string(&snapshot).unwrap_or_default();
        let event = Event::default().event("output").data(data);
        Some((Ok::<_, Infallible>(event), (rx, false)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
