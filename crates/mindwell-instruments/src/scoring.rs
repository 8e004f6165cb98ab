use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Closed range of valid answer values for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: u8,
    pub max: u8,
}

impl ScoreRange {
    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A question in an instrument's static bank, tagged with the factor it
/// contributes to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item<F: 'static> {
    pub id: u32,
    pub factor: F,
    pub text: &'static str,
}

/// Static definition of a factor (or dimension): which questions feed it
/// and what a typical score looks like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorDef<F: 'static> {
    pub key: F,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub question_ids: &'static [u32],
    /// Inclusive reference range for a healthy population, where known.
    pub normal_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NormalRange {
    pub low: f64,
    pub high: f64,
}

/// Serializable view of a factor, as listed by the instrument catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub question_ids: Vec<u32>,
    pub normal_range: Option<NormalRange>,
}

impl<F> From<&FactorDef<F>> for Domain {
    fn from(def: &FactorDef<F>) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: (!def.description.is_empty()).then(|| def.description.to_string()),
            question_ids: def.question_ids.to_vec(),
            normal_range: def.normal_range.map(|(low, high)| NormalRange { low, high }),
        }
    }
}

/// Serializable view of a question.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub domain_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub question_id: u32,
    pub value: u8,
    pub expected_range: ScoreRange,
    pub message: String,
}
