use crate::domain::submission::SubmissionStatus;
use crate::domain::{StepNumber, UserId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VerificationError>;

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("step {attempted} is out of sequence, current step is {current}")]
    Sequence {
        attempted: StepNumber,
        current: StepNumber,
    },
    #[error("submission for step {step} is {status}, expected {expected}")]
    State {
        step: StepNumber,
        status: SubmissionStatus,
        expected: &'static str,
    },
    #[error("reviewer {0} is not allowed to review submissions")]
    Authorization(String),
    #[error("concurrent update of step {step} for user {user}")]
    Conflict { user: UserId, step: StepNumber },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}
