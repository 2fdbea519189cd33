use crate::domain::submission::FieldMap;
use crate::domain::{StepNumber, UserId};
use crate::error::{Result, VerificationError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Submit,
    Approve,
    Reject,
}

/// One row of a verification action file.
///
/// `actor` is the reviewer identity for approve/reject rows. `data` carries
/// the submitted fields as `key=value` pairs joined by `|`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Action {
    pub action: ActionType,
    pub user: UserId,
    pub step: StepNumber,
    pub actor: Option<String>,
    pub data: Option<String>,
    pub reason: Option<String>,
}

impl Action {
    /// Parses the `data` column into a field map. Pairs without `=` are
    /// dropped; keys and values are trimmed.
    pub fn fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        let Some(data) = &self.data else {
            return fields;
        };
        for pair in data.split('|') {
            if let Some((key, value)) = pair.split_once('=') {
                fields.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        fields
    }
}

/// Reads verification actions from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Action>`, with
/// whitespace trimming and flexible record lengths handled automatically.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    /// Creates a new `ActionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes actions.
    pub fn actions(self) -> impl Iterator<Item = Result<Action>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(VerificationError::from))
    }
}
