use crate::domain::ports::SubmissionStore;
use crate::domain::submission::Submission;
use crate::domain::{StepNumber, UserId};
use crate::error::{Result, VerificationError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Column family for storing submission records.
pub const CF_SUBMISSIONS: &str = "submissions";

/// A persistent submission store backed by RocksDB.
///
/// Records live in a dedicated column family keyed by the big-endian
/// `(user, step)` pair, which keeps one user's submissions adjacent for
/// prefix scans and makes the full iteration come out in (user, step) order.
/// RocksDB has no native compare-and-set, so the version check and the write
/// are serialized through a store-level mutex.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbSubmissionStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

fn submission_key(user: UserId, step: StepNumber) -> [u8; 10] {
    let mut key = [0u8; 10];
    key[..8].copy_from_slice(&user.to_be_bytes());
    key[8..].copy_from_slice(&step.to_be_bytes());
    key
}

fn decode(bytes: &[u8]) -> Result<Submission> {
    serde_json::from_slice(bytes)
        .map_err(|e| VerificationError::Storage(format!("failed to deserialize submission: {e}")))
}

impl RocksDbSubmissionStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the submissions column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_submissions = ColumnFamilyDescriptor::new(CF_SUBMISSIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_submissions])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_SUBMISSIONS).ok_or_else(|| {
            VerificationError::Storage("submissions column family not found".to_string())
        })
    }

    fn read(&self, user: UserId, step: StepNumber) -> Result<Option<Submission>> {
        let cf = self.cf()?;
        match self.db.get_cf(&cf, submission_key(user, step))? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SubmissionStore for RocksDbSubmissionStore {
    async fn get(&self, user: UserId, step: StepNumber) -> Result<Option<Submission>> {
        self.read(user, step)
    }

    async fn put(&self, mut submission: Submission) -> Result<Submission> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| VerificationError::Storage("write lock poisoned".to_string()))?;

        let stored_version = self
            .read(submission.user, submission.step)?
            .map(|s| s.version)
            .unwrap_or(0);
        if stored_version != submission.version {
            return Err(VerificationError::Conflict {
                user: submission.user,
                step: submission.step,
            });
        }

        submission.version += 1;
        let value = serde_json::to_vec(&submission).map_err(|e| {
            VerificationError::Storage(format!("failed to serialize submission: {e}"))
        })?;
        let cf = self.cf()?;
        self.db
            .put_cf(&cf, submission_key(submission.user, submission.step), value)?;

        Ok(submission)
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Submission>> {
        let cf = self.cf()?;
        let prefix = user.to_be_bytes();
        let start = submission_key(user, 0);
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&start, Direction::Forward));

        let mut submissions = Vec::new();
        for item in iter {
            let (key, value) =
                item.map_err(|e| VerificationError::Storage(format!("iteration failed: {e}")))?;
            if !key.starts_with(&prefix) {
                break;
            }
            submissions.push(decode(&value)?);
        }
        Ok(submissions)
    }

    async fn all(&self) -> Result<Vec<Submission>> {
        let cf = self.cf()?;
        let iter = self.db.iterator_cf(cf, IteratorMode::Start);

        let mut submissions = Vec::new();
        for item in iter {
            let (_key, value) =
                item.map_err(|e| VerificationError::Storage(format!("iteration failed: {e}")))?;
            submissions.push(decode(&value)?);
        }
        Ok(submissions)
    }
}
