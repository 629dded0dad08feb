use std::sync::Arc;

use crate::analysis::SentimentAnalyzer;
use crate::feed::ChangeFeed;
use crate::store::FeedbackStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production, in-memory when no `DATABASE_URL` is configured.
    pub store: Arc<dyn FeedbackStore>,
    pub analyzer: Arc<dyn SentimentAnalyzer>,
    /// Change events for the feedback table; live views subscribe here.
    pub feed: ChangeFeed,
}
