use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::answer_set::AnswerSet;
use crate::error::CoreError;

/// A completed assessment as handed to the persistence layer.
///
/// `result` holds the instrument-specific result object so one envelope
/// covers every instrument; use [`AssessmentRecord::result_as`] to recover
/// the typed value.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub instrument_id: String,
    pub answers: AnswerSet,
    pub result: serde_json::Value,
    pub created_at: jiff::Timestamp,
}

impl AssessmentRecord {
    pub fn new(
        user_id: Uuid,
        instrument_id: impl Into<String>,
        answers: AnswerSet,
        result: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            instrument_id: instrument_id.into(),
            answers,
            result,
            created_at: jiff::Timestamp::now(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize the stored result, checking it came from `instrument_id`.
    pub fn result_as<T: DeserializeOwned>(&self, instrument_id: &str) -> Result<T, CoreError> {
        if self.instrument_id != instrument_id {
            return Err(CoreError::InstrumentMismatch {
                expected: instrument_id.to_string(),
                found: self.instrument_id.clone(),
            });
        }
        Ok(serde_json::from_value(self.result.clone())?)
    }
}

/// One user's records for `instrument_id`, oldest first.
pub fn user_history<'a>(
    records: &'a [AssessmentRecord],
    user_id: Uuid,
    instrument_id: &str,
) -> Vec<&'a AssessmentRecord> {
    let mut matching: Vec<&AssessmentRecord> = records
        .iter()
        .filter(|r| r.user_id == user_id && r.instrument_id == instrument_id)
        .collect();
    matching.sort_by_key(|r| r.created_at);
    matching
}

/// Pick one user's two most recent records for `instrument_id` as
/// `(current, previous)`.
///
/// Returns `None` when fewer than two matching records exist.
pub fn latest_pair<'a>(
    records: &'a [AssessmentRecord],
    user_id: Uuid,
    instrument_id: &str,
) -> Option<(&'a AssessmentRecord, &'a AssessmentRecord)> {
    match user_history(records, user_id, instrument_id).as_slice() {
        [.., previous, current] => Some((*current, *previous)),
        _ => None,
    }
}
