//! Feedback sentiment service: AI sentiment analysis of text and voice
//! feedback, persisted and pushed to live list and dashboard views.

pub mod analysis;
pub mod config;
pub mod db;
pub mod errors;
pub mod extractors;
pub mod feed;
pub mod feedback;
pub mod i18n;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod views;
pub mod voice;

pub use routes::build_router;
pub use state::AppState;
