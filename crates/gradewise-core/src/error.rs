//! Grading error types.
//!
//! Grading itself is pure string and arithmetic work over validated input, so
//! the only failures are configuration problems: a question that cannot be
//! scored, or heuristic settings that would produce inconsistent marks.

use thiserror::Error;

/// Errors that can occur when grading a response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradingError {
    /// The question record carries no `max_marks` value at all.
    #[error("configuration error: question '{question_id}' has no max_marks")]
    MissingMaxMarks { question_id: String },

    /// The question's `max_marks` is zero or negative.
    #[error("configuration error: question '{question_id}' has max_marks {max_marks}, expected a positive value")]
    InvalidMaxMarks { question_id: String, max_marks: i64 },

    /// The grading configuration is internally inconsistent.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

impl GradingError {
    /// Returns `true` for errors caused by question or engine configuration.
    ///
    /// Every current variant is a configuration error; callers use this to
    /// decide whether a failed submission should be retried after the
    /// question store is fixed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GradingError::MissingMaxMarks { .. }
                | GradingError::InvalidMaxMarks { .. }
                | GradingError::InvalidConfig(_)
        )
    }

    /// The question this error refers to, if any.
    pub fn question_id(&self) -> Option<&str> {
        match self {
            GradingError::MissingMaxMarks { question_id }
            | GradingError::InvalidMaxMarks { question_id, .. } => Some(question_id),
            GradingError::InvalidConfig(_) => None,
        }
    }
}
