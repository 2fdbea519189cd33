use crate::domain::ports::{AccessControlBox, NotifierBox, SubmissionStoreBox};
use crate::domain::progress::{self, VerificationProgress};
use crate::domain::step::StepRegistry;
use crate::domain::submission::{FieldMap, ReviewOutcome, Submission};
use crate::domain::{StepNumber, UserId};
use crate::error::{Result, VerificationError};
use chrono::Utc;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::warn;

/// Read-validate-write attempts before a version conflict is surfaced as a
/// storage error.
const MAX_PUT_ATTEMPTS: u32 = 3;

/// The main entry point for the verification workflow.
///
/// `VerificationEngine` owns the step registry and the storage, notification
/// and access-control ports. `submit` and `review` are read-check-then-write
/// cycles guarded by the store's version check; on conflict the whole cycle
/// is retried a bounded number of times.
pub struct VerificationEngine {
    registry: StepRegistry,
    store: SubmissionStoreBox,
    access: AccessControlBox,
    notifier: NotifierBox,
}

impl VerificationEngine {
    pub fn new(
        registry: StepRegistry,
        store: SubmissionStoreBox,
        access: AccessControlBox,
        notifier: NotifierBox,
    ) -> Self {
        Self {
            registry,
            store,
            access,
            notifier,
        }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// Submits step data on behalf of `user`.
    ///
    /// Only the user's current step can be submitted, and only while its
    /// status is pending or rejected. Data must satisfy the step's required
    /// fields. Returns the stored submission.
    pub async fn submit(&self, user: UserId, step: StepNumber, data: FieldMap) -> Result<Submission> {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let submissions = self.store.list_for_user(user).await?;
            let current = progress::project(&self.registry, user, &submissions).current_step;
            if step != current {
                return Err(VerificationError::Sequence {
                    attempted: step,
                    current,
                });
            }

            let definition = self.registry.get(step).ok_or_else(|| {
                VerificationError::Validation(format!("unknown step {step}"))
            })?;
            definition.validate(&data)?;

            let mut submission = submissions
                .into_iter()
                .find(|s| s.step == step)
                .unwrap_or_else(|| Submission::pending(user, step));
            submission.submit(data.clone(), Utc::now())?;

            match self.store.put(submission).await {
                Ok(stored) => return Ok(stored),
                Err(VerificationError::Conflict { .. }) if attempt < MAX_PUT_ATTEMPTS => {
                    backoff(attempt).await;
                }
                Err(VerificationError::Conflict { user, step }) => {
                    return Err(conflict_exhausted(user, step));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Applies an admin review decision to a submitted step.
    ///
    /// Approval marks the step verified; rejection requires a non-empty
    /// reason and sends the step back to the user. The notifier is invoked
    /// after the write succeeds; its failure is logged, never propagated.
    pub async fn review(
        &self,
        reviewer: &str,
        user: UserId,
        step: StepNumber,
        outcome: ReviewOutcome,
        reason: Option<String>,
    ) -> Result<Submission> {
        self.access.authorize_review(reviewer).await?;

        let mut attempt = 0;
        let stored = loop {
            attempt += 1;

            let mut submission = self
                .store
                .get(user, step)
                .await?
                .unwrap_or_else(|| Submission::pending(user, step));
            match outcome {
                ReviewOutcome::Approve => submission.approve(reviewer, Utc::now())?,
                ReviewOutcome::Reject => {
                    submission.reject(reviewer, reason.as_deref().unwrap_or(""), Utc::now())?
                }
            }

            match self.store.put(submission).await {
                Ok(stored) => break stored,
                Err(VerificationError::Conflict { .. }) if attempt < MAX_PUT_ATTEMPTS => {
                    backoff(attempt).await;
                }
                Err(VerificationError::Conflict { user, step }) => {
                    return Err(conflict_exhausted(user, step));
                }
                Err(e) => return Err(e),
            }
        };

        if let Err(e) = self
            .notifier
            .notify(user, step, outcome, stored.rejection_reason.as_deref())
            .await
        {
            warn!(user, step, error = %e, "review notification failed");
        }

        Ok(stored)
    }

    /// The progress projection for one user.
    pub async fn progress(&self, user: UserId) -> Result<VerificationProgress> {
        let submissions = self.store.list_for_user(user).await?;
        Ok(progress::project(&self.registry, user, &submissions))
    }

    /// Progress projections for every user known to the store, ordered by
    /// user id.
    pub async fn all_progress(&self) -> Result<Vec<VerificationProgress>> {
        let users: BTreeSet<UserId> = self.store.all().await?.iter().map(|s| s.user).collect();
        let mut reports = Vec::with_capacity(users.len());
        for user in users {
            reports.push(self.progress(user).await?);
        }
        Ok(reports)
    }
}

async fn backoff(attempt: u32) {
    tokio::time::sleep(Duration::from_millis(10 * u64::from(attempt))).await;
}

fn conflict_exhausted(user: UserId, step: StepNumber) -> VerificationError {
    VerificationError::Storage(format!(
        "update of step {step} for user {user} still conflicting after {MAX_PUT_ATTEMPTS} attempts"
    ))
}
