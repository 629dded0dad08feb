use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::feed::{ChangeEvent, ChangeFeed, ChangeKind};
use crate::models::{FeedbackRecord, NewFeedback};
use crate::store::{FeedbackStore, StoreError};

/// Process-local store. Rows are kept in insertion order and published to the
/// change feed the way the Postgres trigger would.
pub struct MemoryFeedbackStore {
    rows: RwLock<Vec<FeedbackRecord>>,
    feed: ChangeFeed,
}

impl MemoryFeedbackStore {
    pub fn new(feed: ChangeFeed) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            feed,
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        let record = FeedbackRecord {
            id: Uuid::new_v4(),
            original_text: feedback.original_text,
            language: feedback.language,
            sentiment: feedback.sentiment,
            sentiment_score: feedback.sentiment_score,
            positive_keywords: feedback.positive_keywords,
            negative_keywords: feedback.negative_keywords,
            ai_response: feedback.ai_response,
            ai_suggestions: feedback.ai_suggestions,
            created_at: Utc::now(),
        };
        self.rows.write().await.push(record.clone());
        self.feed.publish(ChangeEvent::feedback(ChangeKind::Insert));
        Ok(record)
    }

    async fn list_recent(&self, limit: Option<usize>) -> Result<Vec<FeedbackRecord>, StoreError> {
        let rows = self.rows.read().await;
        let newest_first = rows.iter().rev().cloned();
        Ok(match limit {
            Some(n) => newest_first.take(n).collect(),
            None => newest_first.collect(),
        })
    }
}
