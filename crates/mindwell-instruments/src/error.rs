use mindwell_core::error::CoreError;
use thiserror::Error;

use crate::scoring::ValidationError;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument '{0}'")]
    UnknownInstrument(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("instrument '{instrument_id}' has unanswered questions: {question_ids:?}")]
    MissingAnswers {
        instrument_id: String,
        question_ids: Vec<u32>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record error: {0}")]
    Record(#[from] CoreError),
}
