use crate::domain::step::StepRegistry;
use crate::domain::submission::{Submission, SubmissionStatus};
use crate::domain::{StepNumber, UserId};
use serde::Serialize;

/// Status of one step as presented to the UI.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct StepProgress {
    pub number: StepNumber,
    pub name: String,
    pub status: SubmissionStatus,
    pub rejection_reason: Option<String>,
}

/// The authoritative projection consumed by presentation.
///
/// `current_step` is the first step in order that is not yet verified, or
/// `last + 1` once every step is. Clients render this as-is instead of
/// recomputing status flags locally.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct VerificationProgress {
    pub user: UserId,
    pub current_step: StepNumber,
    pub verified: usize,
    pub total: usize,
    pub steps: Vec<StepProgress>,
}

impl VerificationProgress {
    /// Fraction of steps verified, in `0.0..=1.0`.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.verified as f64 / self.total as f64
    }
}

/// Projects a user's submissions onto the step registry.
///
/// Recomputed on every read. Submissions for steps outside the registry are
/// ignored; registry steps with no submission read as pending.
pub fn project(
    registry: &StepRegistry,
    user: UserId,
    submissions: &[Submission],
) -> VerificationProgress {
    let steps: Vec<StepProgress> = registry
        .steps()
        .iter()
        .map(|definition| {
            let submission = submissions.iter().find(|s| s.step == definition.number);
            StepProgress {
                number: definition.number,
                name: definition.name.clone(),
                status: submission.map(|s| s.status).unwrap_or_default(),
                rejection_reason: submission.and_then(|s| s.rejection_reason.clone()),
            }
        })
        .collect();

    let current_step = steps
        .iter()
        .find(|step| step.status != SubmissionStatus::Verified)
        .map(|step| step.number)
        .unwrap_or(registry.last_step() + 1);
    let verified = steps
        .iter()
        .filter(|step| step.status == SubmissionStatus::Verified)
        .count();

    VerificationProgress {
        user,
        current_step,
        verified,
        total: steps.len(),
        steps,
    }
}
