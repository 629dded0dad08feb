pub mod feedback;
pub mod notification;

pub use feedback::{FeedbackRecord, Language, NewFeedback, Sentiment};
pub use notification::{Notification, NotificationVariant};
