// Sentiment analysis: prompt the completion endpoint, adapt its free-form
// reply into an `AnalysisResult`, fall back to a neutral default when the
// reply cannot be parsed.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod prompts;

pub use analyzer::{AnalysisError, AnalysisResult, LlmSentimentAnalyzer, SentimentAnalyzer};
