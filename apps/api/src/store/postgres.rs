use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::{FeedbackRecord, NewFeedback};
use crate::store::{FeedbackStore, StoreError};

/// Postgres-backed store. Change events come from the table trigger, not from here.
#[derive(Clone)]
pub struct PgFeedbackStore {
    pool: PgPool,
}

impl PgFeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        let record = sqlx::query_as::<_, FeedbackRecord>(
            r#"
            INSERT INTO feedback
                (original_text, language, sentiment, sentiment_score,
                 positive_keywords, negative_keywords, ai_response, ai_suggestions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&feedback.original_text)
        .bind(feedback.language)
        .bind(feedback.sentiment)
        .bind(feedback.sentiment_score)
        .bind(&feedback.positive_keywords)
        .bind(&feedback.negative_keywords)
        .bind(&feedback.ai_response)
        .bind(&feedback.ai_suggestions)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted feedback {} ({})", record.id, record.sentiment);
        Ok(record)
    }

    async fn list_recent(&self, limit: Option<usize>) -> Result<Vec<FeedbackRecord>, StoreError> {
        // LIMIT NULL reads every row
        let limit = limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX));
        Ok(sqlx::query_as::<_, FeedbackRecord>(
            "SELECT * FROM feedback ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}
