//! Realtime views over the feedback table.
//!
//! A view owns its own state, performs a full read on mount, and re-reads
//! everything whenever the change feed fires. Event payloads are ignored:
//! there is no incremental patching.

pub mod dashboard;
pub mod form;
pub mod handlers;
pub mod list;

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::feed::ChangeEvent;
use crate::store::FeedbackStore;

pub use dashboard::{DashboardSnapshot, DashboardView, SentimentStats};
pub use form::FeedbackForm;
pub use list::{FeedbackListSnapshot, FeedbackListView};

const SSE_KEEP_ALIVE_SECS: u64 = 15;

/// A per-view state object that can be refreshed from the store.
#[async_trait]
pub trait LiveView: Send {
    type Snapshot: Serialize + Send + 'static;

    /// SSE event name used when the view is streamed.
    const EVENT_NAME: &'static str;

    /// Re-reads the store. A failed read is logged and the previous state kept.
    async fn refresh(&mut self, store: &dyn FeedbackStore);

    fn snapshot(&self) -> Self::Snapshot;
}

/// Yields a snapshot after the initial read and after every change event.
///
/// The receiver must be subscribed before calling so no change between the
/// initial read and the subscription is missed. Dropping the stream
/// unsubscribes.
pub fn live_snapshots<V>(
    mut view: V,
    store: Arc<dyn FeedbackStore>,
    mut changes: broadcast::Receiver<ChangeEvent>,
) -> impl Stream<Item = V::Snapshot> + Send
where
    V: LiveView + 'static,
{
    async_stream::stream! {
        view.refresh(store.as_ref()).await;
        yield view.snapshot();

        loop {
            match changes.recv().await {
                Ok(event) => debug!("{} refresh on {:?} of '{}'", V::EVENT_NAME, event.kind, event.table),
                Err(RecvError::Lagged(skipped)) => {
                    debug!("{} lagged by {skipped} events, refreshing", V::EVENT_NAME)
                }
                Err(RecvError::Closed) => break,
            }
            view.refresh(store.as_ref()).await;
            yield view.snapshot();
        }
    }
}

/// Wraps a snapshot stream as Server-Sent Events named after the view.
pub fn into_sse<V, S>(snapshots: S) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    V: LiveView,
    S: Stream<Item = V::Snapshot> + Send + 'static,
{
    let events = snapshots.filter_map(|snapshot| async move {
        match Event::default().event(V::EVENT_NAME).json_data(&snapshot) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                warn!("Failed to serialize {} snapshot: {e}", V::EVENT_NAME);
                None
            }
        }
    });

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(SSE_KEEP_ALIVE_SECS))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    use crate::feed::ChangeFeed;
    use crate::feedback::submission::submit;
    use crate::feedback::submission::test_support::{scenario_analysis, StubAnalyzer};
    use crate::models::{Language, Sentiment};
    use crate::store::MemoryFeedbackStore;

    #[tokio::test]
    async fn test_list_and_dashboard_refresh_after_submission() {
        let feed = ChangeFeed::new(16);
        let store = Arc::new(MemoryFeedbackStore::new(feed.clone()));
        let analyzer = StubAnalyzer::returning(scenario_analysis());

        let list = live_snapshots(FeedbackListView::default(), store.clone(), feed.subscribe());
        let dashboard = live_snapshots(DashboardView::new(Language::En), store.clone(), feed.subscribe());
        futures::pin_mut!(list);
        futures::pin_mut!(dashboard);

        let initial_list = list.next().await.unwrap();
        assert!(initial_list.records.is_empty());
        let initial_dash = dashboard.next().await.unwrap();
        assert_eq!(initial_dash.stats, SentimentStats::default());

        submit(&analyzer, store.as_ref(), "Great service, very fast!", Language::En)
            .await
            .unwrap();

        let list_after = list.next().await.unwrap();
        assert_eq!(list_after.records[0].original_text, "Great service, very fast!");
        assert_eq!(list_after.records[0].sentiment, Sentiment::Positive);

        let dash_after = dashboard.next().await.unwrap();
        assert_eq!(dash_after.stats.positive, initial_dash.stats.positive + 1);
        assert_eq!(dash_after.stats.total, 1);
    }

    #[tokio::test]
    async fn test_dropping_stream_unsubscribes() {
        let feed = ChangeFeed::new(4);
        let store = Arc::new(MemoryFeedbackStore::new(feed.clone()));

        let stream = live_snapshots(FeedbackListView::default(), store, feed.subscribe());
        assert_eq!(feed.subscriber_count(), 1);
        drop(stream);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
