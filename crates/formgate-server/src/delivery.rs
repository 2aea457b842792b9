use formgate_core::{Notifier, NotifyError, Submission};
use std::time::Duration;

/// Hand an accepted submission to the notifier, bounded by `timeout`.
///
/// The client has already been judged Accepted; a failed delivery is logged
/// and returned but does not change the verdict.
pub async fn dispatch(
    notifier: &dyn Notifier,
    submission: &Submission,
    timeout: Duration,
) -> Result<(), NotifyError> {
    let result = match tokio::time::timeout(timeout, notifier.deliver(submission)).await {
        Ok(result) => result,
        Err(_) => Err(NotifyError::Timeout(timeout)),
    };
    if let Err(e) = &result {
        tracing::warn!(notifier = notifier.name(), error = %e, "delivery failed");
    }
    result
}
