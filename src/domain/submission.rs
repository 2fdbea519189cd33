use crate::domain::{StepNumber, UserId};
use crate::error::{Result, VerificationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field values captured for one step, keyed by field identifier.
pub type FieldMap = BTreeMap<String, String>;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Submitted,
    Verified,
    Rejected,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Verified => "verified",
            SubmissionStatus::Rejected => "rejected",
        };
        f.write_str(status)
    }
}

/// The decision taken on a submitted step.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReviewOutcome {
    Approve,
    Reject,
}

/// A user's attempt to complete one verification step.
///
/// One record exists per (user, step). `version` is the optimistic
/// concurrency token: the store accepts a write only when it matches the
/// stored version and bumps it on success.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Submission {
    pub user: UserId,
    pub step: StepNumber,
    pub status: SubmissionStatus,
    pub data: FieldMap,
    /// Present only while the status is `Rejected`.
    pub rejection_reason: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewer_id: Option<String>,
    pub version: u64,
}

impl Submission {
    /// The default record for a step the user has not touched yet.
    pub fn pending(user: UserId, step: StepNumber) -> Self {
        Self {
            user,
            step,
            status: SubmissionStatus::Pending,
            data: FieldMap::new(),
            rejection_reason: None,
            submitted_at: None,
            reviewed_at: None,
            reviewer_id: None,
            version: 0,
        }
    }

    /// Moves the submission into review. Allowed from `Pending` and
    /// `Rejected` (resubmission), which clears any previous review outcome.
    pub fn submit(&mut self, data: FieldMap, now: DateTime<Utc>) -> Result<()> {
        match self.status {
            SubmissionStatus::Pending | SubmissionStatus::Rejected => {
                self.status = SubmissionStatus::Submitted;
                self.data = data;
                self.rejection_reason = None;
                self.submitted_at = Some(now);
                self.reviewed_at = None;
                self.reviewer_id = None;
                Ok(())
            }
            status => Err(VerificationError::State {
                step: self.step,
                status,
                expected: "pending or rejected",
            }),
        }
    }

    /// Marks a submitted step as verified.
    pub fn approve(&mut self, reviewer: &str, now: DateTime<Utc>) -> Result<()> {
        self.require_submitted()?;
        self.status = SubmissionStatus::Verified;
        self.reviewed_at = Some(now);
        self.reviewer_id = Some(reviewer.to_string());
        Ok(())
    }

    /// Sends a submitted step back to the user. A non-empty reason is
    /// mandatory.
    pub fn reject(&mut self, reviewer: &str, reason: &str, now: DateTime<Utc>) -> Result<()> {
        self.require_submitted()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(VerificationError::Validation(
                "rejecting a submission requires a reason".to_string(),
            ));
        }
        self.status = SubmissionStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        self.reviewed_at = Some(now);
        self.reviewer_id = Some(reviewer.to_string());
        Ok(())
    }

    fn require_submitted(&self) -> Result<()> {
        if self.status == SubmissionStatus::Submitted {
            Ok(())
        } else {
            Err(VerificationError::State {
                step: self.step,
                status: self.status,
                expected: "submitted",
            })
        }
    }
}
