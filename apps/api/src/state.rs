use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::evaluation::session::Session;
use crate::extraction::DocumentExtractor;
use crate::feedback::FeedbackGenerator;
use crate::scoring::Evaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring pipeline. Owns the default vocabulary and the embedding handle.
    pub evaluator: Evaluator,
    pub extractor: DocumentExtractor,
    /// Pluggable feedback backend. Default: LlmFeedbackGenerator.
    pub feedback: Arc<dyn FeedbackGenerator>,
    /// Registered JDs and the last run's results. Single-session, in-memory.
    pub session: Arc<RwLock<Session>>,
}
