//! Error types for the recommendation engine.

use thiserror::Error;

/// Errors surfaced to callers of the engine.
///
/// Running out of candidates is not an error: `recommend` reports it as `None`.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The caller broke an input contract (wrong vector length, non-finite value, ...).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The recipe dataset could not be read.
    #[error("Failed to load recipe dataset from {path}: {message}")]
    DatasetLoad { path: String, message: String },

    /// A required dataset column is missing.
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// A nutrient cell could not be read as a non-negative number.
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

impl RecommendError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        RecommendError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
