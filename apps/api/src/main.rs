use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use feedback_api::analysis::LlmSentimentAnalyzer;
use feedback_api::config::Config;
use feedback_api::db::create_pool;
use feedback_api::feed::{spawn_pg_listener, ChangeFeed};
use feedback_api::llm_client::{self, LlmClient};
use feedback_api::store::{FeedbackStore, MemoryFeedbackStore, PgFeedbackStore};
use feedback_api::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Feedback API v{}", env!("CARGO_PKG_VERSION"));

    let feed = ChangeFeed::new(config.feed_capacity);

    // Initialize datastore + change feed source
    let store: Arc<dyn FeedbackStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            spawn_pg_listener(&pool, feed.clone()).await?;
            Arc::new(PgFeedbackStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, feedback is kept in memory only");
            Arc::new(MemoryFeedbackStore::new(feed.clone()))
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_api_url.clone(), config.llm_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let analyzer = Arc::new(LlmSentimentAnalyzer::new(Arc::new(llm)));

    let state = AppState {
        store,
        analyzer,
        feed,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
