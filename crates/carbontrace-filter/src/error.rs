//! Filter engine error types

use crate::{Field, Operator, Source};
use thiserror::Error;

/// Result type alias for criterion construction and evaluation
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// An invalid filter request
///
/// Every variant is detected before any candidate record is scanned, so a
/// failed step never leaves a partially evaluated result behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Field name not present in the field table
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Operator spelling not recognized
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Operator not allowed for the field's type
    #[error("Operator '{operator}' is not valid for field '{field}' (allowed: {allowed})")]
    IncompatibleOperator {
        /// Requested field
        field: Field,
        /// Requested operator
        operator: Operator,
        /// Operators the field accepts
        allowed: String,
    },

    /// Comparison value does not fit the field's type
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        /// Requested field
        field: Field,
        /// Offending value as given
        value: String,
        /// Description of the issue
        reason: String,
    },

    /// Candidate records come from a different source than the criterion reads
    #[error("Criterion reads the {expected} but candidates come from the {actual}")]
    SourceMismatch {
        /// Source the criterion reads
        expected: Source,
        /// Source the candidates were taken from
        actual: Source,
    },
}

/// Errors from the source-backed [`FilterEngine`](crate::FilterEngine)
#[derive(Error, Debug)]
pub enum EngineError {
    /// The criterion itself is invalid
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A data source failed to deliver candidates
    #[error("Source error: {0}")]
    Source(String),
}
