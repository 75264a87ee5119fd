//! Error types for the upload/predict workflow.
//!
//! - [`WorkflowError`] - classified outcome of a failed network step
//! - [`Failure`] - what the session remembers about the last failure
//!
//! Both clients (browser and native) map their transport errors into
//! [`WorkflowError`] so the session and the UI never see a
//! platform-specific error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Workflow Errors
// =============================================================================

/// Errors raised while talking to the asset host or the predictor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The request never produced a response (DNS, connection, CORS...).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("Server error ({code}): {body}")]
    Status { code: u16, body: String },

    /// No response within the configured time budget.
    #[error("Request timed out")]
    Timeout,

    /// The body was not the JSON shape we expect.
    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),

    /// The predictor returned a label outside 0..=9.
    #[error("Predicted digit out of range: {0}")]
    DigitOutOfRange(i64),

    /// A browser API (FormData, object URLs) refused the operation.
    #[error("Browser error: {0}")]
    Browser(String),

    /// Reading the local image failed.
    #[error("Failed to read image: {0}")]
    Io(String),
}

impl From<std::io::Error> for WorkflowError {
    fn from(err: std::io::Error) -> Self {
        WorkflowError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        WorkflowError::MalformedResponse(err.to_string())
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

// =============================================================================
// Session Failures
// =============================================================================

/// Which network step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Upload,
    Prediction,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Upload => write!(f, "Upload"),
            Stage::Prediction => write!(f, "Prediction"),
        }
    }
}

/// A failure recorded in the session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub stage: Stage,
    pub message: String,
    /// True when the request ran out of time rather than being rejected.
    #[serde(default)]
    pub timed_out: bool,
}

impl Failure {
    pub fn new(stage: Stage, error: &WorkflowError) -> Self {
        Self {
            stage,
            message: error.to_string(),
            timed_out: matches!(error, WorkflowError::Timeout),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_format() {
        let err = WorkflowError::Status {
            code: 500,
            body: "boom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_failure_from_timeout() {
        let failure = Failure::new(Stage::Prediction, &WorkflowError::Timeout);
        assert!(failure.timed_out);
        assert_eq!(failure.to_string(), "Prediction failed: Request timed out");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: WorkflowError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, WorkflowError::MalformedResponse(_)));
    }
}
