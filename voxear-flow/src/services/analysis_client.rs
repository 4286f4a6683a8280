//! Remote analysis service client
//!
//! `POST {service_url}/analyze/` with the media under multipart field `file`.
//!
//! Every outcome is normalized into an [`AnalysisResponse`]; transport and
//! parse failures never escape this module as errors.

use crate::error::FlowError;
use crate::models::{AnalysisResponse, SessionFile};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

/// Path of the analysis endpoint, relative to the service URL
pub const ANALYZE_PATH: &str = "/analyze/";

/// Multipart field carrying the media bytes
pub const FILE_FIELD: &str = "file";

/// Message prefix for transport failures
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

const USER_AGENT: &str = concat!("voxear/", env!("CARGO_PKG_VERSION"));
const FALLBACK_MIME: &str = "application/octet-stream";

/// Failures inside the client before normalization
#[derive(Debug, Error)]
enum AnalysisClientError {
    #[error("{}", network_message(.0))]
    Network(String),

    /// Non-2xx status; message is the service `detail` or a status fallback
    #[error("{1}")]
    Status(u16, String),

    #[error("Invalid response from analysis service: {0}")]
    Parse(String),

    #[error("Invalid upload: {0}")]
    InvalidFile(String),
}

fn network_message(detail: &str) -> String {
    if detail.trim().is_empty() {
        NETWORK_ERROR_MESSAGE.to_string()
    } else {
        format!("{} ({})", NETWORK_ERROR_MESSAGE, detail)
    }
}

/// Anything that can turn a session file into an analysis response
///
/// Implementations must not fail: every problem is reported through
/// `AnalysisResponse::failed`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, file: &SessionFile) -> AnalysisResponse;
}

/// HTTP client for the analysis service
pub struct AnalysisClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl AnalysisClient {
    /// Create a client for the service at `service_url`
    ///
    /// No request timeout is configured here; bounding the wait is the
    /// controller's job.
    pub fn new(service_url: &str) -> Result<Self, FlowError> {
        let base = service_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(FlowError::Config(
                "analysis service URL is empty".to_string(),
            ));
        }
        let endpoint = format!("{}{}", base, ANALYZE_PATH);
        reqwest::Url::parse(&endpoint)
            .map_err(|e| FlowError::Config(format!("invalid URL {base}: {e}")))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FlowError::Config(format!("HTTP client error: {e}")))?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, file: &SessionFile) -> Result<AnalysisResponse, AnalysisClientError> {
        let part = Part::stream(file.contents())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type().unwrap_or(FALLBACK_MIME))
            .map_err(|e| AnalysisClientError::InvalidFile(e.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        tracing::debug!(
            endpoint = %self.endpoint,
            file = %file.name(),
            size = file.size(),
            "Sending analysis request"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalysisClientError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(&body)
                .unwrap_or_else(|| format!("Upload failed with status {}", status.as_u16()));
            return Err(AnalysisClientError::Status(status.as_u16(), message));
        }

        response
            .json::<AnalysisResponse>()
            .await
            .map_err(|e| AnalysisClientError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, file: &SessionFile) -> AnalysisResponse {
        match self.send(file).await {
            Ok(response) => {
                tracing::info!(
                    status = ?response.status,
                    file = %file.name(),
                    "Analysis service responded"
                );
                response
            }
            Err(e) => {
                let code = match &e {
                    AnalysisClientError::Status(code, _) => Some(*code),
                    _ => None,
                };
                tracing::error!(error = %e, http_status = ?code, "Analysis request failed");
                AnalysisResponse::failed(e.to_string())
            }
        }
    }
}

/// Extract `detail` from an error body
///
/// String details are used as-is; structured ones (validation error lists)
/// are rendered as compact JSON.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = AnalysisClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/analyze/");
    }

    #[test]
    fn test_empty_or_invalid_url_rejected() {
        assert!(AnalysisClient::new("   ").is_err());
        assert!(AnalysisClient::new("not a url").is_err());
    }

    #[test]
    fn test_error_detail_variants() {
        assert_eq!(
            error_detail(r#"{"detail": "File too large"}"#),
            Some("File too large".to_string())
        );
        let structured = r#"{"detail": [{"loc": ["body", "file"], "msg": "field required"}]}"#;
        let compact = r#"[{"loc":["body","file"],"msg":"field required"}]"#;
        assert_eq!(error_detail(structured), Some(compact.to_string()));
        assert_eq!(error_detail(r#"{"detail": null}"#), None);
        assert_eq!(error_detail(r#"{"other": 1}"#), None);
        assert_eq!(error_detail("<html>502</html>"), None);
    }

    #[test]
    fn test_network_message_formatting() {
        assert_eq!(network_message(""), NETWORK_ERROR_MESSAGE);
        assert_eq!(
            AnalysisClientError::Network("connection refused".to_string()).to_string(),
            "Network error occurred (connection refused)"
        );
        assert_eq!(
            AnalysisClientError::Status(500, "Upload failed with status 500".to_string())
                .to_string(),
            "Upload failed with status 500"
        );
    }
}
