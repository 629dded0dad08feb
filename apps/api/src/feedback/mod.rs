// Feedback submission: validate, analyze, persist, notify.

pub mod handlers;
pub mod submission;

pub use submission::{submit, SubmissionError, SubmissionOutcome};
