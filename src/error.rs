//! Error types for the extract_colors library

use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Error surface for palette extraction
///
/// Validation errors are raised eagerly when a component is constructed with
/// bad parameters; state and empty-input errors surface to the caller at the
/// point of use. Extraction is pure and deterministic for a given seed, so
/// no variant is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Input image buffer contained zero bytes
    #[error("image buffer is empty")]
    EmptyImage,

    /// A palette query required at least one swatch
    #[error("palette contains no swatches")]
    EmptyPalette,

    /// A color string could not be parsed
    #[error("failed to parse color {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// A parameter was outside its valid range
    #[error("invalid parameter: {parameter} = {value}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
    },

    /// A point fed to a clustering routine carried a NaN or infinite component
    #[error("non-finite coordinate in point {point}")]
    NonFinitePoint { point: String },

    /// The caller's cancel token fired mid-extraction
    #[error("extraction was cancelled")]
    Cancelled,
}

impl ExtractionError {
    /// Create a validation error naming the offending parameter
    pub fn invalid_parameter(parameter: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter,
            value: value.to_string(),
        }
    }

    /// Create a parse error with the rejected input
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a non-finite point error naming the offending input
    pub fn non_finite(point: &[f64]) -> Self {
        Self::NonFinitePoint {
            point: format!("{point:?}"),
        }
    }

    /// Check whether this error came from bad caller input rather than state
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExtractionError::Parse { .. }
                | ExtractionError::InvalidParameter { .. }
                | ExtractionError::NonFinitePoint { .. }
        )
    }
}
