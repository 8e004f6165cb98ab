//! mindwell-instruments
//!
//! Self-assessment questionnaire definitions and their scoring. Pure,
//! synchronous computation: static question banks, a generic factor scorer
//! and the instruments built on it (SCL-90, Emotion Health).

pub mod engine;
pub mod error;
pub mod history;
pub mod instruments;
pub mod policy;
pub mod scoring;

use mindwell_core::models::AnswerSet;

use error::InstrumentError;
use policy::{MissingAnswerPolicy, ScoringPolicy};
use scoring::{Domain, Question, ScoreRange, ValidationError};

/// Trait implemented by each questionnaire.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "scl90").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "SCL-90").
    fn name(&self) -> &str;

    /// Valid answer values for every question.
    fn answer_range(&self) -> ScoreRange;

    /// The factors this instrument scores.
    fn domains(&self) -> &[Domain];

    /// The full question bank, ordered by id.
    fn questions(&self) -> &[Question];

    /// Check every answer against the bank and the answer range.
    fn validate_answers(&self, answers: &AnswerSet) -> Vec<ValidationError> {
        let range = self.answer_range();
        let mut errors = Vec::new();
        for (question_id, value) in answers.iter() {
            if !self.questions().iter().any(|q| q.id == question_id) {
                errors.push(ValidationError {
                    question_id,
                    value,
                    expected_range: range,
                    message: format!("{}: question {question_id} does not exist", self.name()),
                });
            } else if !range.contains(value) {
                errors.push(ValidationError {
                    question_id,
                    value,
                    expected_range: range,
                    message: format!(
                        "{}: answer {value} to question {question_id} is outside range [{}, {}]",
                        self.name(),
                        range.min,
                        range.max,
                    ),
                });
            }
        }
        errors
    }

    /// Question ids in the bank that `answers` does not cover.
    fn missing_questions(&self, answers: &AnswerSet) -> Vec<u32> {
        self.questions()
            .iter()
            .map(|q| q.id)
            .filter(|id| !answers.contains(*id))
            .collect()
    }

    /// Apply the missing-answer policy, returning the value unanswered
    /// questions should be scored as.
    fn prepare_answers(
        &self,
        answers: &AnswerSet,
        policy: MissingAnswerPolicy,
    ) -> Result<u8, InstrumentError> {
        let neutral = self.answer_range().min;
        match policy {
            MissingAnswerPolicy::DefaultNeutral => {
                let missing = self.missing_questions(answers).len();
                if missing > 0 {
                    tracing::warn!(
                        instrument = self.id(),
                        missing,
                        neutral,
                        "scoring incomplete answer set with neutral defaults"
                    );
                }
                Ok(neutral)
            }
            MissingAnswerPolicy::Reject => {
                if let Some(error) = self.validate_answers(answers).into_iter().next() {
                    return Err(error.into());
                }
                let missing = self.missing_questions(answers);
                if !missing.is_empty() {
                    return Err(InstrumentError::MissingAnswers {
                        instrument_id: self.id().to_string(),
                        question_ids: missing,
                    });
                }
                Ok(neutral)
            }
        }
    }

    /// Score an answer set, returning the instrument's result as JSON.
    fn score(
        &self,
        answers: &AnswerSet,
        policy: &ScoringPolicy,
    ) -> Result<serde_json::Value, InstrumentError>;

    /// Format a result returned by [`Instrument::score`] as structured text
    /// for the interpretation model's prompt.
    fn describe_result(
        &self,
        result: &serde_json::Value,
        policy: &ScoringPolicy,
    ) -> Result<String, InstrumentError>;

    /// Score an answer set and format the result as structured text.
    fn to_structured_input(
        &self,
        answers: &AnswerSet,
        policy: &ScoringPolicy,
    ) -> Result<String, InstrumentError> {
        let result = self.score(answers, policy)?;
        self.describe_result(&result, policy)
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::scl90::Scl90),
        Box::new(instruments::emotion_health::EmotionHealth),
    ]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}
