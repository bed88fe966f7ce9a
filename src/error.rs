//! Error types for the listings pipeline.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Infrastructure errors (artifact store, data loading) are kept apart from
//! validation failures so callers can tell "the data is bad" from "the run broke".

use crate::exit_codes;
use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// Artifact could not be resolved, downloaded, or published.
    #[error("Artifact store error: {0}")]
    ArtifactError(String),

    /// Dataset could not be read, written, or is missing required columns.
    #[error("Data error: {0}")]
    DataError(String),

    /// One or more validation checks failed.
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl PipelineError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::UserError(_) => exit_codes::USER_ERROR,
            PipelineError::ArtifactError(_) => exit_codes::ARTIFACT_FAILURE,
            PipelineError::DataError(_) => exit_codes::DATA_FAILURE,
            PipelineError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
        }
    }

    /// Whether this error aborts a run rather than reporting bad data.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            PipelineError::ArtifactError(_) | PipelineError::DataError(_)
        )
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = PipelineError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(!err.is_infrastructure());
    }

    #[test]
    fn artifact_error_has_correct_exit_code() {
        let err = PipelineError::ArtifactError("unknown artifact".to_string());
        assert_eq!(err.exit_code(), exit_codes::ARTIFACT_FAILURE);
        assert!(err.is_infrastructure());
    }

    #[test]
    fn data_error_has_correct_exit_code() {
        let err = PipelineError::DataError("missing column".to_string());
        assert_eq!(err.exit_code(), exit_codes::DATA_FAILURE);
        assert!(err.is_infrastructure());
    }

    #[test]
    fn validation_error_has_correct_exit_code() {
        let err = PipelineError::ValidationError("row_count".to_string());
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
        assert!(!err.is_infrastructure());
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = PipelineError::ArtifactError("'raw.csv:v9' not found".to_string());
        assert_eq!(err.to_string(), "Artifact store error: 'raw.csv:v9' not found");

        let err = PipelineError::ValidationError("2 of 6 checks failed".to_string());
        assert_eq!(err.to_string(), "Validation failed: 2 of 6 checks failed");
    }
}
