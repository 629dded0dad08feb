use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::i18n::messages;
use crate::models::{FeedbackRecord, Language, Sentiment};
use crate::store::FeedbackStore;
use crate::views::LiveView;

/// Records carried alongside the aggregate counts.
pub const DASHBOARD_RECENT: usize = 10;

/// Aggregate counts. `positive + negative + neutral == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentStats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentStats {
    /// Full O(n) scan. Record volume is assumed small.
    pub fn from_records(records: &[FeedbackRecord]) -> Self {
        records.iter().fold(Self::default(), |mut stats, record| {
            stats.total += 1;
            match record.sentiment {
                Sentiment::Positive => stats.positive += 1,
                Sentiment::Negative => stats.negative += 1,
                Sentiment::Neutral => stats.neutral += 1,
            }
            stats
        })
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }
}

/// One bar / pie slice of the sentiment charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub sentiment: Sentiment,
    pub label: &'static str,
    pub count: usize,
    pub color: &'static str,
}

fn chart_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "hsl(142 76% 36%)",
        Sentiment::Negative => "hsl(0 84% 60%)",
        Sentiment::Neutral => "hsl(38 92% 50%)",
    }
}

pub fn chart_series(stats: &SentimentStats, language: Language) -> Vec<ChartSlice> {
    let msgs = messages(language);
    Sentiment::ALL
        .into_iter()
        .map(|sentiment| ChartSlice {
            sentiment,
            label: msgs.sentiment_label(sentiment),
            count: stats.count(sentiment),
            color: chart_color(sentiment),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub stats: SentimentStats,
    pub chart: Vec<ChartSlice>,
    pub recent: Vec<FeedbackRecord>,
    pub loading: bool,
}

/// Analytics tab: counts over every record plus the latest few.
pub struct DashboardView {
    language: Language,
    stats: SentimentStats,
    recent: Vec<FeedbackRecord>,
    loading: bool,
}

impl DashboardView {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            stats: SentimentStats::default(),
            recent: Vec::new(),
            loading: true,
        }
    }

    /// A view already populated from `records` (newest first).
    pub fn loaded(language: Language, records: Vec<FeedbackRecord>) -> Self {
        let mut view = Self::new(language);
        view.apply(records);
        view.loading = false;
        view
    }

    pub fn stats(&self) -> SentimentStats {
        self.stats
    }

    fn apply(&mut self, mut records: Vec<FeedbackRecord>) {
        self.stats = SentimentStats::from_records(&records);
        records.truncate(DASHBOARD_RECENT);
        self.recent = records;
    }
}

#[async_trait]
impl LiveView for DashboardView {
    type Snapshot = DashboardSnapshot;
    const EVENT_NAME: &'static str = "dashboard";

    async fn refresh(&mut self, store: &dyn FeedbackStore) {
        match store.list_recent(None).await {
            Ok(records) => self.apply(records),
            Err(e) => warn!("Error fetching analytics: {e}"),
        }
        self.loading = false;
    }

    fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            stats: self.stats,
            chart: chart_series(&self.stats, self.language),
            recent: self.recent.clone(),
            loading: self.loading,
        }
    }
}
