use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extractors::AppQuery;
use crate::models::Language;
use crate::state::AppState;
use crate::views::list::DEFAULT_LIST_LIMIT;
use crate::views::{
    into_sse, live_snapshots, DashboardSnapshot, DashboardView, FeedbackListSnapshot,
    FeedbackListView, LiveView,
};

const MAX_LIST_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

impl ListQuery {
    fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    #[serde(default)]
    pub lang: Language,
}

/// GET /api/v1/feedback
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<FeedbackListSnapshot>, AppError> {
    let limit = query.limit();
    let records = state.store.list_recent(Some(limit)).await?;
    Ok(Json(FeedbackListView::loaded(limit, records).snapshot()))
}

/// GET /api/v1/feedback/live
///
/// Streams a fresh list snapshot on connect and after every change.
pub async fn handle_list_live(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(
        "Feedback list subscriber connected ({} active)",
        state.feed.subscriber_count()
    );
    let changes = state.feed.subscribe();
    let snapshots = live_snapshots(
        FeedbackListView::new(query.limit()),
        state.store.clone(),
        changes,
    );
    into_sse::<FeedbackListView, _>(snapshots)
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LanguageQuery>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let records = state.store.list_recent(None).await?;
    Ok(Json(DashboardView::loaded(query.lang, records).snapshot()))
}

/// GET /api/v1/dashboard/live
pub async fn handle_dashboard_live(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LanguageQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(
        "Dashboard subscriber connected ({} active)",
        state.feed.subscriber_count()
    );
    let changes = state.feed.subscribe();
    let snapshots = live_snapshots(DashboardView::new(query.lang), state.store.clone(), changes);
    into_sse::<DashboardView, _>(snapshots)
}
