use std::sync::Arc;

use crate::interview::controller::InterviewController;
use crate::interview::session::SessionStore;
use crate::vector_store::PineconeClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// In-memory session registry. Sessions do not survive a restart.
    pub sessions: SessionStore,
    pub controller: Arc<InterviewController>,
    pub vector_store: Arc<PineconeClient>,
}
