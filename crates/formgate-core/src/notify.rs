//! Delivery seam for accepted submissions.
//!
//! Only a log-based notifier ships here; mail or webhook delivery is plugged
//! in by implementing [`Notifier`].

use crate::form::{Submission, SubmissionStatus};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("refusing to deliver a {0} submission")]
    NotAccepted(SubmissionStatus),

    #[error("delivery failed: {message}")]
    Failed { message: String },

    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, submission: &Submission) -> Result<(), NotifyError>;
}

/// Records accepted submissions in the log. Values are never logged, only
/// field names and their lengths.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, submission: &Submission) -> Result<(), NotifyError> {
        if submission.status != SubmissionStatus::Accepted {
            return Err(NotifyError::NotAccepted(submission.status));
        }
        let shape: Vec<String> = submission
            .fields
            .iter()
            .map(|(name, value)| format!("{name}:{}", value.chars().count()))
            .collect();
        tracing::info!(notifier = self.name(), fields = ?shape, "contact submission received");
        Ok(())
    }
}
