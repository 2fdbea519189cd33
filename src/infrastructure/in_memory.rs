use crate::domain::ports::SubmissionStore;
use crate::domain::submission::Submission;
use crate::domain::{StepNumber, UserId};
use crate::error::{Result, VerificationError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for submissions.
///
/// Uses `Arc<RwLock<HashMap<(UserId, StepNumber), Submission>>>` for shared
/// concurrent access. The version compare-and-set runs entirely under the
/// write lock, so concurrent writers cannot interleave.
#[derive(Default, Clone)]
pub struct InMemorySubmissionStore {
    submissions: Arc<RwLock<HashMap<(UserId, StepNumber), Submission>>>,
}

impl InMemorySubmissionStore {
    /// Creates a new, empty in-memory submission store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn get(&self, user: UserId, step: StepNumber) -> Result<Option<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions.get(&(user, step)).cloned())
    }

    async fn put(&self, mut submission: Submission) -> Result<Submission> {
        let mut submissions = self.submissions.write().await;
        let key = (submission.user, submission.step);
        let stored_version = submissions.get(&key).map(|s| s.version).unwrap_or(0);
        if stored_version != submission.version {
            return Err(VerificationError::Conflict {
                user: submission.user,
                step: submission.step,
            });
        }
        submission.version += 1;
        submissions.insert(key, submission.clone());
        Ok(submission)
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        let mut result: Vec<Submission> = submissions
            .values()
            .filter(|s| s.user == user)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.step);
        Ok(result)
    }

    async fn all(&self) -> Result<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        let mut result: Vec<Submission> = submissions.values().cloned().collect();
        result.sort_by_key(|s| (s.user, s.step));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::{FieldMap, SubmissionStatus};
    use chrono::Utc;

    #[tokio::test]
    async fn test_put_bumps_version() {
        let store = InMemorySubmissionStore::new();

        let submission = Submission::pending(1, 1);
        let stored = store.put(submission).await.unwrap();
        assert_eq!(stored.version, 1);

        let stored = store.put(stored).await.unwrap();
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_put_with_stale_version_conflicts() {
        let store = InMemorySubmissionStore::new();

        let submission = Submission::pending(1, 1);
        let first = store.put(submission.clone()).await.unwrap();

        // A second writer still holding version 0 must be turned away.
        let result = store.put(submission).await;
        assert!(matches!(
            result,
            Err(VerificationError::Conflict { user: 1, step: 1 })
        ));

        // The stored record is untouched.
        let stored = store.get(1, 1).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = InMemorySubmissionStore::new();
        assert!(store.get(1, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_user_is_ordered_and_isolated() {
        let store = InMemorySubmissionStore::new();

        let mut second = Submission::pending(1, 2);
        second.submit(FieldMap::new(), Utc::now()).unwrap();
        store.put(second).await.unwrap();
        store.put(Submission::pending(1, 1)).await.unwrap();
        store.put(Submission::pending(2, 1)).await.unwrap();

        let listed = store.list_for_user(1).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].step, 1);
        assert_eq!(listed[1].step, 2);
        assert_eq!(listed[1].status, SubmissionStatus::Submitted);
    }

    #[tokio::test]
    async fn test_all_orders_by_user_then_step() {
        let store = InMemorySubmissionStore::new();
        store.put(Submission::pending(2, 1)).await.unwrap();
        store.put(Submission::pending(1, 2)).await.unwrap();
        store.put(Submission::pending(1, 1)).await.unwrap();

        let all = store.all().await.unwrap();
        let keys: Vec<(UserId, StepNumber)> = all.iter().map(|s| (s.user, s.step)).collect();
        assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1)]);
    }
}
