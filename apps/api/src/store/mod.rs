//! Datastore seam for feedback records.
//!
//! `PgFeedbackStore` is the production backend; `MemoryFeedbackStore` backs
//! local runs without `DATABASE_URL` and the tests. Both are insert-only.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FeedbackRecord, NewFeedback};

pub use memory::MemoryFeedbackStore;
pub use postgres::PgFeedbackStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Inserts one record, returning it with its assigned `id` and `created_at`.
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError>;

    /// Records ordered by `created_at` descending. `None` reads everything.
    async fn list_recent(&self, limit: Option<usize>) -> Result<Vec<FeedbackRecord>, StoreError>;
}
