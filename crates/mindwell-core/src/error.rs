use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record belongs to instrument '{found}', expected '{expected}'")]
    InstrumentMismatch { expected: String, found: String },
}
