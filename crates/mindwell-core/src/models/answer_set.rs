use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Raw answers to a questionnaire, keyed by question id.
///
/// Serializes as a JSON object (`{"1": 3, "2": 1, ...}`), the same shape the
/// answer wizard submits. Iteration is always in ascending question id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct AnswerSet(BTreeMap<u32, u8>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an answer set giving every id in `ids` the same value.
    pub fn filled(ids: impl IntoIterator<Item = u32>, value: u8) -> Self {
        ids.into_iter().map(|id| (id, value)).collect()
    }

    pub fn get(&self, question_id: u32) -> Option<u8> {
        self.0.get(&question_id).copied()
    }

    pub fn contains(&self, question_id: u32) -> bool {
        self.0.contains_key(&question_id)
    }

    /// Record an answer, returning the value it replaced.
    pub fn insert(&mut self, question_id: u32, value: u8) -> Option<u8> {
        self.0.insert(question_id, value)
    }

    pub fn remove(&mut self, question_id: u32) -> Option<u8> {
        self.0.remove(&question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.0.iter().map(|(id, value)| (*id, *value))
    }

    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.values().copied()
    }
}

impl FromIterator<(u32, u8)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (u32, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<u32, u8>> for AnswerSet {
    fn from(map: BTreeMap<u32, u8>) -> Self {
        Self(map)
    }
}
