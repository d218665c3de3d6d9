//! Error types for the comparison pipeline

use std::fmt;

/// Errors that can occur while comparing two recordings
///
/// These never cross the [`crate::compare`] boundary: the entry point logs them and
/// degrades to [`crate::AnalysisResult::failed`].
#[derive(Debug, Clone)]
pub enum ComparisonError {
    /// Invalid input parameters (configuration, lengths, sample rates)
    InvalidInput(String),

    /// Input file unreadable or undecodable
    DecodingError(String),

    /// Processing error during feature extraction, alignment or scoring
    ProcessingError(String),

    /// Numerical error (non-finite intermediate values, degenerate transforms)
    NumericalError(String),
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ComparisonError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            ComparisonError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            ComparisonError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for ComparisonError {}

impl From<std::io::Error> for ComparisonError {
    fn from(err: std::io::Error) -> Self {
        ComparisonError::DecodingError(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for ComparisonError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        ComparisonError::DecodingError(err.to_string())
    }
}
