//! Change feed: push notification that rows in the feedback table changed.
//!
//! Subscribers only learn *that* something changed. Views discard the event and
//! re-read the table, so the payload stays deliberately small.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Postgres NOTIFY channel written by the `feedback_change_notify` trigger.
pub const FEEDBACK_CHANNEL: &str = "feedback_changes";
pub const FEEDBACK_TABLE: &str = "feedback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    /// Parses a trigger `TG_OP` value (`INSERT`, `UPDATE`, `DELETE`).
    pub fn from_tg_op(op: &str) -> Option<Self> {
        match op.trim().to_ascii_uppercase().as_str() {
            "INSERT" => Some(ChangeKind::Insert),
            "UPDATE" => Some(ChangeKind::Update),
            "DELETE" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn feedback(kind: ChangeKind) -> Self {
        Self {
            table: FEEDBACK_TABLE.to_string(),
            kind,
        }
    }
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        info!("Change feed initialized with capacity {capacity}");
        Self { tx }
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        match self.tx.send(event) {
            Ok(count) => debug!("Change event delivered to {count} subscribers"),
            Err(_) => debug!("Change event dropped: no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Forwards Postgres notifications on [`FEEDBACK_CHANNEL`] into the feed.
pub async fn spawn_pg_listener(pool: &PgPool, feed: ChangeFeed) -> anyhow::Result<JoinHandle<()>> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(FEEDBACK_CHANNEL).await?;
    info!("Listening for Postgres notifications on '{FEEDBACK_CHANNEL}'");

    Ok(tokio::spawn(async move {
        loop {
            match listener.try_recv().await {
                Ok(Some(notification)) => {
                    feed.publish(listener_event(Some(notification.payload())));
                }
                Ok(None) => {
                    // Reconnects on the next call; anything sent meanwhile is gone
                    warn!("Postgres listener connection lost, resyncing subscribers");
                    feed.publish(listener_event(None));
                }
                Err(e) => {
                    warn!("Postgres listener error: {e}");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    feed.publish(listener_event(None));
                }
            }
        }
    }))
}

/// Maps a notification payload to an event. `None` stands for a dropped
/// connection, after which subscribers must re-read.
fn listener_event(payload: Option<&str>) -> ChangeEvent {
    let kind = payload
        .and_then(ChangeKind::from_tg_op)
        .unwrap_or(ChangeKind::Update);
    ChangeEvent::feedback(kind)
}
