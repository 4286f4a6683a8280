//! Analysis service payloads
//!
//! Wire shapes of `POST /analyze/` plus the normalized outcome the
//! controller acts on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message used when a failure carries no usable text
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed";

/// Message shown for failures that escaped normal handling
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Message used for malformed success payloads
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Malformed analysis response";

/// Verdict label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Real,
    Fake,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Real => write!(f, "real"),
            Label::Fake => write!(f, "fake"),
        }
    }
}

/// Model certainty bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Per-step status as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStepStatus {
    Completed,
    Skipped,
    Failed,
}

/// Service-side step outcome, correlated with local steps by id only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStep {
    pub id: u32,
    pub status: RemoteStepStatus,
}

/// Authoritative verdict for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub label: Label,
    /// Probability that the media is fake, in [0, 1]
    pub probability: f64,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<RemoteStep>>,
}

impl AnalysisResult {
    /// Check invariants the wire format cannot express
    pub fn validate(&self) -> Result<(), String> {
        if !self.probability.is_finite() || !(0.0..=1.0).contains(&self.probability) {
            return Err(format!("probability {} outside [0, 1]", self.probability));
        }
        Ok(())
    }

    /// Probability as a whole percentage
    pub fn percentage(&self) -> u32 {
        (self.probability * 100.0).round() as u32
    }

    /// Service-reported steps (empty when absent)
    pub fn remote_steps(&self) -> &[RemoteStep] {
        self.steps.as_deref().unwrap_or(&[])
    }
}

/// Top-level status of an analysis response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Completed,
    Failed,
}

/// Normalized response of the analysis client
///
/// Mirrors the service body: `{status, result?, error?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResponse {
    pub fn completed(result: AnalysisResult) -> Self {
        Self {
            status: AnalysisStatus::Completed,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: AnalysisStatus::Failed,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Collapse into either a valid result or a workflow error
    ///
    /// A "completed" response without a result or with an out-of-range
    /// probability is treated as a failure; a partial result never survives
    /// next to an error.
    pub fn into_outcome(self) -> Result<AnalysisResult, WorkflowError> {
        match self.status {
            AnalysisStatus::Completed => {
                let result = self
                    .result
                    .ok_or_else(|| WorkflowError::new(MALFORMED_RESPONSE_MESSAGE))?;
                result.validate().map_err(|reason| {
                    tracing::warn!(reason = %reason, "Rejecting analysis result");
                    WorkflowError::new(MALFORMED_RESPONSE_MESSAGE)
                })?;
                Ok(result)
            }
            AnalysisStatus::Failed => Err(WorkflowError::new(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            )),
        }
    }
}

/// Terminal failure of a workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowError {
    pub message: String,
}

impl WorkflowError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Generic user-visible error for unexpected failures
    pub fn unexpected() -> Self {
        Self::new(UNEXPECTED_ERROR_MESSAGE)
    }
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(probability: f64) -> AnalysisResult {
        AnalysisResult {
            label: Label::Fake,
            probability,
            confidence: Confidence::High,
            steps: None,
        }
    }

    #[test]
    fn test_parses_service_body() {
        let body = r#"{
            "status": "completed",
            "result": {
                "label": "fake",
                "probability": 0.92,
                "confidence": "high",
                "steps": [{"id": 3, "status": "skipped"}]
            }
        }"#;
        let response: AnalysisResponse = serde_json::from_str(body).unwrap();
        let result = response.into_outcome().unwrap();
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.percentage(), 92);
        assert_eq!(
            result.remote_steps(),
            &[RemoteStep {
                id: 3,
                status: RemoteStepStatus::Skipped,
            }]
        );
    }

    #[test]
    fn test_completed_without_result_is_malformed() {
        let response = AnalysisResponse {
            status: AnalysisStatus::Completed,
            result: None,
            error: None,
        };
        assert_eq!(
            response.into_outcome().unwrap_err().message,
            MALFORMED_RESPONSE_MESSAGE
        );
    }

    #[test]
    fn test_out_of_range_probability_is_malformed() {
        let err = AnalysisResponse::completed(result(1.5))
            .into_outcome()
            .unwrap_err();
        assert_eq!(err.message, MALFORMED_RESPONSE_MESSAGE);

        let err = AnalysisResponse::completed(result(f64::NAN))
            .into_outcome()
            .unwrap_err();
        assert_eq!(err.message, MALFORMED_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_failed_keeps_message_or_falls_back() {
        let err = AnalysisResponse::failed("Unsupported codec")
            .into_outcome()
            .unwrap_err();
        assert_eq!(err.message, "Unsupported codec");

        let blank = AnalysisResponse {
            status: AnalysisStatus::Failed,
            result: None,
            error: Some("  ".to_string()),
        };
        assert_eq!(
            blank.into_outcome().unwrap_err().message,
            GENERIC_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(result(0.925).percentage(), 93);
        assert_eq!(result(0.0).percentage(), 0);
        assert_eq!(result(1.0).percentage(), 100);
    }

    #[test]
    fn test_missing_steps_serialize_away() {
        let json = serde_json::to_value(result(0.1)).unwrap();
        assert!(json.get("steps").is_none());
    }
}
