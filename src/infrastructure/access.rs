use crate::domain::ports::AccessControl;
use crate::error::{Result, VerificationError};
use async_trait::async_trait;
use std::collections::HashSet;

/// Allow-list access control for review operations.
///
/// Only explicitly listed reviewer identities may approve or reject. An
/// empty list admits nobody.
#[derive(Default, Clone)]
pub struct AllowListAccessControl {
    reviewers: HashSet<String>,
}

impl AllowListAccessControl {
    pub fn new<I, S>(reviewers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reviewers: reviewers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl AccessControl for AllowListAccessControl {
    async fn authorize_review(&self, reviewer: &str) -> Result<()> {
        if self.reviewers.contains(reviewer) {
            Ok(())
        } else {
            Err(VerificationError::Authorization(reviewer.to_string()))
        }
    }
}
