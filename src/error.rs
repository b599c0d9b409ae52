use crate::constants::{EMPTY_TOPIC_NOTICE, MAX_WORD_COUNT, MIN_WORD_COUNT};
use thiserror::Error;

/// Input rejected before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", EMPTY_TOPIC_NOTICE)]
    EmptyTopic,
    #[error("Word count {0} is outside {}..={}", MIN_WORD_COUNT, MAX_WORD_COUNT)]
    WordCountOutOfRange(u32),
    #[error("Unknown tone: {0}")]
    UnknownTone(String),
    #[error("Unknown format: {0}")]
    UnknownFormat(String),
    #[error("A generation is already in progress")]
    GenerationInFlight,
    #[error("No generation is in progress")]
    NoGenerationInFlight,
}

/// Errors surfaced to the user by the view controller.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Any provider failure. The provider detail is logged, not carried here.
    #[error("{message}")]
    GenerationFailed { message: String },
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),
}

impl WizardError {
    pub fn is_validation(&self) -> bool {
        matches!(self, WizardError::Validation(_))
    }
}
