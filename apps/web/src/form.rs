//! Form session: the one form instance this process hosts.
//!
//! Owns the loaded catalog, the user's selection, the output buffer and the
//! generation lifecycle (Idle -> Loading -> Idle). Every change to the output
//! or loading flag is republished on a `watch` channel for the live view.

use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::catalog::filter::{distinct_objectives, filter_by_objective};
use crate::catalog::loader::FeedError;
use crate::catalog::Catalog;
use crate::generation::client::{GenerationRequest, Generator};
use crate::models::framework::FrameworkRecord;

pub const FEED_FAILED_MESSAGE: &str = "Failed to load frameworks list";
pub const MISSING_SELECTION_MESSAGE: &str = "Select a framework and enter a keyword first.";
pub const GENERATION_FAILED_MESSAGE: &str = "Error from server";
pub const BUSY_MESSAGE: &str = "A generation is already running.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub objective: Option<String>,
    pub framework_id: Option<String>,
    pub keyword: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    FeedLoadFailed,
    GenerationFailed,
}

/// A user-visible alert. Shown once, then cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// What the live output area shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputSnapshot {
    pub output: String,
    pub loading: bool,
}

/// Everything the page needs for one render.
#[derive(Debug, Clone)]
pub struct PageModel {
    pub objectives: Vec<String>,
    pub active_objective: Option<String>,
    pub frameworks: Vec<FrameworkRecord>,
    pub selected_framework: Option<String>,
    pub keyword: String,
    pub output: OutputSnapshot,
    pub notice: Option<Notice>,
}

#[derive(Debug, Default)]
struct FormState {
    catalog: Catalog,
    selection: SelectionState,
    output: String,
    loading: bool,
    notice: Option<Notice>,
}

impl FormState {
    fn snapshot(&self) -> OutputSnapshot {
        OutputSnapshot {
            output: self.output.clone(),
            loading: self.loading,
        }
    }
}

pub struct FormSession {
    state: Mutex<FormState>,
    generator: Arc<dyn Generator>,
    snapshots: watch::Sender<OutputSnapshot>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl FormSession {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        let (snapshots, _) = watch::channel(OutputSnapshot::default());
        Self {
            state: Mutex::new(FormState::default()),
            generator,
            snapshots,
        }
    }

    /// Live output updates. The receiver starts at the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<OutputSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self, state: &FormState) {
        self.snapshots.send_replace(state.snapshot());
    }

    /// Installs the result of a feed fetch. A failure empties the record set
    /// and raises a notice; the session stays usable either way.
    pub async fn apply_feed(&self, result: Result<Catalog, FeedError>) {
        let mut state = self.state.lock().await;
        match result {
            Ok(catalog) => state.catalog = catalog,
            Err(e) => {
                error!("Framework feed load failed: {e}");
                state.catalog = Catalog::default();
                state.notice = Some(Notice::new(NoticeKind::FeedLoadFailed, FEED_FAILED_MESSAGE));
            }
        }
        let keep = state
            .selection
            .framework_id
            .as_deref()
            .is_some_and(|id| state.catalog.get(id).is_some());
        if !keep {
            state.selection.framework_id = None;
        }
    }

    pub async fn contains_framework(&self, id: &str) -> bool {
        self.state.lock().await.catalog.get(id).is_some()
    }

    pub async fn framework(&self, id: &str) -> Option<FrameworkRecord> {
        self.state.lock().await.catalog.get(id).cloned()
    }

    pub async fn objectives(&self) -> Vec<String> {
        distinct_objectives(self.state.lock().await.catalog.records())
    }

    pub async fn frameworks(&self, objective: Option<&str>) -> Vec<FrameworkRecord> {
        let state = self.state.lock().await;
        filter_by_objective(state.catalog.records(), objective)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Sets or clears ("All") the objective filter. A selected framework that
    /// falls outside the new filter is deselected.
    pub async fn set_objective(&self, objective: Option<String>) {
        let mut state = self.state.lock().await;
        let objective = non_empty(objective).map(|o| o.trim().to_string());

        let visible = match (&state.selection.framework_id, &objective) {
            (Some(id), Some(tag)) => state
                .catalog
                .get(id)
                .is_some_and(|r| r.has_objective(tag)),
            _ => true,
        };
        if !visible {
            state.selection.framework_id = None;
        }
        state.selection.objective = objective;
    }

    pub async fn set_selection(&self, framework_id: Option<String>, keyword: String) {
        let mut state = self.state.lock().await;
        state.selection.framework_id = non_empty(framework_id);
        state.selection.keyword = keyword;
    }

    pub async fn snapshot(&self) -> OutputSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Builds the render model and consumes the pending notice.
    pub async fn page(&self) -> PageModel {
        let mut state = self.state.lock().await;
        let frameworks = filter_by_objective(
            state.catalog.records(),
            state.selection.objective.as_deref(),
        )
        .into_iter()
        .cloned()
        .collect();

        PageModel {
            objectives: distinct_objectives(state.catalog.records()),
            active_objective: state.selection.objective.clone(),
            frameworks,
            selected_framework: state.selection.framework_id.clone(),
            keyword: state.selection.keyword.clone(),
            output: state.snapshot(),
            notice: state.notice.take(),
        }
    }

    /// Validates the selection and moves Idle -> Loading. On rejection a
    /// notice is raised, nothing is sent, and `None` is returned.
    ///
    /// Requests are serialized: a submit while Loading is rejected so chunks
    /// from two streams can never interleave.
    pub async fn begin_generation(&self) -> Option<GenerationRequest> {
        let mut state = self.state.lock().await;

        if state.loading {
            warn!("Generation rejected: another request is in flight");
            state.notice = Some(Notice::new(NoticeKind::GenerationFailed, BUSY_MESSAGE));
            return None;
        }

        let keyword = state.selection.keyword.clone();
        let framework_id = match state.selection.framework_id.clone() {
            Some(id) if !keyword.trim().is_empty() => id,
            _ => {
                state.notice = Some(Notice::new(
                    NoticeKind::GenerationFailed,
                    MISSING_SELECTION_MESSAGE,
                ));
                return None;
            }
        };

        state.output.clear();
        state.loading = true;
        state.notice = None;
        self.publish(&state);

        Some(GenerationRequest::new(framework_id, keyword))
    }

    /// Runs one accepted request to completion, appending each chunk to the
    /// output buffer and republishing after every chunk.
    pub async fn run_generation(&self, request: GenerationRequest) {
        info!(
            "Generation started: framework={} keyword={:?}",
            request.framework_id, request.answers.keyword
        );

        let mut chunks = match self.generator.start(&request).await {
            Ok(chunks) => chunks,
            Err(e) => {
                error!("Generation request failed: {e}");
                self.fail().await;
                return;
            }
        };

        let mut received = 0usize;
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(text) => {
                    received += 1;
                    let mut state = self.state.lock().await;
                    state.output.push_str(&text);
                    self.publish(&state);
                }
                Err(e) => {
                    error!("Generation stream broke after {received} chunks: {e}");
                    self.fail().await;
                    return;
                }
            }
        }

        let mut state = self.state.lock().await;
        state.loading = false;
        self.publish(&state);
        debug!("Generation finished: {received} chunks, {} bytes", state.output.len());
    }

    async fn fail(&self) {
        let mut state = self.state.lock().await;
        state.output.clear();
        state.loading = false;
        state.notice = Some(Notice::new(
            NoticeKind::GenerationFailed,
            GENERATION_FAILED_MESSAGE,
        ));
        self.publish(&state);
    }
}
