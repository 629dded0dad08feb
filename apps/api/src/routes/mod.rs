pub mod health;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::handlers as analysis;
use crate::feedback::handlers as feedback;
use crate::state::AppState;
use crate::views::handlers as views;

/// Any origin; the header set browser clients of the datastore SDK send.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // External-facing functions
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/voice-to-text", post(analysis::handle_voice_to_text))
        // Submission + history
        .route(
            "/api/v1/feedback",
            get(views::handle_list_feedback).post(feedback::handle_submit_feedback),
        )
        .route("/api/v1/feedback/live", get(views::handle_list_live))
        // Analytics
        .route("/api/v1/dashboard", get(views::handle_dashboard))
        .route("/api/v1/dashboard/live", get(views::handle_dashboard_live))
        .layer(cors_layer())
        .with_state(state)
}
