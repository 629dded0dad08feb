use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::models::FeedbackRecord;
use crate::store::FeedbackStore;
use crate::views::LiveView;

/// History tab shows at most this many records.
pub const DEFAULT_LIST_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackListSnapshot {
    pub records: Vec<FeedbackRecord>,
    pub loading: bool,
}

/// History list: the most recent records, newest first.
pub struct FeedbackListView {
    limit: usize,
    records: Vec<FeedbackRecord>,
    loading: bool,
}

impl FeedbackListView {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            records: Vec::new(),
            loading: true,
        }
    }

    pub fn loaded(limit: usize, records: Vec<FeedbackRecord>) -> Self {
        Self {
            limit,
            records,
            loading: false,
        }
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }
}

impl Default for FeedbackListView {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_LIMIT)
    }
}

#[async_trait]
impl LiveView for FeedbackListView {
    type Snapshot = FeedbackListSnapshot;
    const EVENT_NAME: &'static str = "feedback_list";

    async fn refresh(&mut self, store: &dyn FeedbackStore) {
        match store.list_recent(Some(self.limit)).await {
            Ok(records) => self.records = records,
            Err(e) => warn!("Error fetching feedback: {e}"),
        }
        self.loading = false;
    }

    fn snapshot(&self) -> FeedbackListSnapshot {
        FeedbackListSnapshot {
            records: self.records.clone(),
            loading: self.loading,
        }
    }
}
