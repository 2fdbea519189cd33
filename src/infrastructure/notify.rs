use crate::domain::ports::Notifier;
use crate::domain::submission::ReviewOutcome;
use crate::domain::{StepNumber, UserId};
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Notifier that emits review outcomes to the tracing log.
///
/// Stands in for the email/webhook channel of a production deployment; the
/// engine treats all notifiers as fire-and-forget.
#[derive(Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        user: UserId,
        step: StepNumber,
        outcome: ReviewOutcome,
        reason: Option<&str>,
    ) -> Result<()> {
        match outcome {
            ReviewOutcome::Approve => info!(user, step, "verification step approved"),
            ReviewOutcome::Reject => {
                info!(user, step, reason = reason.unwrap_or(""), "verification step rejected")
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let notifier = LogNotifier;
        assert!(
            notifier
                .notify(1, 1, ReviewOutcome::Approve, None)
                .await
                .is_ok()
        );
        assert!(
            notifier
                .notify(1, 2, ReviewOutcome::Reject, Some("Document unclear"))
                .await
                .is_ok()
        );
    }
}
