use super::submission::{ReviewOutcome, Submission};
use super::{StepNumber, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Storage port for submissions, keyed by (user, step).
///
/// `put` is the only mutation entry point and performs a compare-and-set on
/// `Submission::version`: the write is accepted only when the carried version
/// matches the stored one (0 when no record exists), and the stored copy gets
/// the version bumped. A mismatch fails with `Conflict` and writes nothing.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn get(&self, user: UserId, step: StepNumber) -> Result<Option<Submission>>;
    /// Returns the stored copy, with its version already bumped.
    async fn put(&self, submission: Submission) -> Result<Submission>;
    /// All submissions of one user, ordered by step.
    async fn list_for_user(&self, user: UserId) -> Result<Vec<Submission>>;
    /// Every submission in the store, ordered by (user, step).
    async fn all(&self) -> Result<Vec<Submission>>;
}

/// Outbound notification channel for review outcomes (email, webhook).
///
/// Fire-and-forget: the engine logs failures and never rolls back a review
/// because of them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        user: UserId,
        step: StepNumber,
        outcome: ReviewOutcome,
        reason: Option<&str>,
    ) -> Result<()>;
}

/// Decides whether a reviewer identity may review submissions.
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Fails with `Authorization` when `reviewer` may not review.
    async fn authorize_review(&self, reviewer: &str) -> Result<()>;
}

pub type SubmissionStoreBox = Box<dyn SubmissionStore>;
pub type NotifierBox = Box<dyn Notifier>;
pub type AccessControlBox = Box<dyn AccessControl>;

/// Factory producing fresh store instances, used where the storage choice is
/// deferred to the caller.
pub type SubmissionStoreFactory = Box<dyn Fn() -> SubmissionStoreBox + Send>;
