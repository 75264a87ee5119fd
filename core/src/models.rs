//! Wire types for the asset host and the predictor, and the [`Digit`] label.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{WorkflowError, WorkflowResult};

// =============================================================================
// Digit
// =============================================================================

/// A predicted label, always in `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Digit {
    type Error = WorkflowError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Digit::new)
            .ok_or(WorkflowError::DigitOutOfRange(value))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Asset host
// =============================================================================

/// Success body of the asset host. Other fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub secure_url: String,
}

/// Extract the durable URL from an upload response body.
pub fn parse_upload_response(body: &str) -> WorkflowResult<String> {
    let response: UploadResponse = serde_json::from_str(body)?;
    if response.secure_url.trim().is_empty() {
        return Err(WorkflowError::MalformedResponse("empty secure_url".to_string()));
    }
    Ok(response.secure_url)
}

// =============================================================================
// Predictor
// =============================================================================

/// JSON body posted to the predictor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub url: String,
}

impl PredictRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Success body of the predictor. Other fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_digit: i64,
}

/// Extract and range-check the label from a predictor response body.
pub fn parse_prediction_response(body: &str) -> WorkflowResult<Digit> {
    let response: PredictionResponse = serde_json::from_str(body)?;
    Digit::try_from(response.predicted_digit)
}
