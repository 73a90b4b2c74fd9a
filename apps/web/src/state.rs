use std::sync::Arc;

use crate::catalog::loader::FeedLoader;
use crate::form::FormSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single form instance; all user-facing state lives here.
    pub session: Arc<FormSession>,
    pub loader: FeedLoader,
}
