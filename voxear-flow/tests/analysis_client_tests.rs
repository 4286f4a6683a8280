//! Analysis client integration tests
//!
//! Exercises the HTTP client against a mock service: success bodies, error
//! statuses, transport failures and the multipart upload format.

mod helpers;

use axum::http::StatusCode;
use helpers::{unreachable_url, video_file, MockReply, MockService};
use serde_json::json;
use voxear_flow::models::{
    AnalysisResponse, AnalysisStatus, Confidence, Label, RemoteStepStatus,
};
use voxear_flow::services::{AnalysisClient, Analyzer};

/// TC-CLIENT-001: Completed response is returned as-is
#[tokio::test]
async fn tc_client_001_completed_response() {
    // Given: A service that reports a fake verdict with step statuses
    let service = MockService::start(MockReply::json(
        StatusCode::OK,
        json!({
            "status": "completed",
            "result": {
                "label": "fake",
                "probability": 0.92,
                "confidence": "high",
                "steps": [
                    {"id": 1, "status": "completed"},
                    {"id": 3, "status": "skipped"}
                ]
            }
        }),
    ))
    .await;
    let client = AnalysisClient::new(&service.url).unwrap();

    // When: A file is analyzed
    let response = client.analyze(&video_file("clip.avi")).await;

    // Then: The verdict and step statuses come through
    assert_eq!(response.status, AnalysisStatus::Completed);
    let result = response.result.expect("result present");
    assert_eq!(result.label, Label::Fake);
    assert_eq!(result.probability, 0.92);
    assert_eq!(result.confidence, Confidence::High);
    let steps = result.steps.expect("steps present");
    assert_eq!(steps[1].id, 3);
    assert_eq!(steps[1].status, RemoteStepStatus::Skipped);
}

/// TC-CLIENT-002: Media is uploaded under multipart field `file`
#[tokio::test]
async fn tc_client_002_multipart_field_name() {
    let service = MockService::start(MockReply::json(
        StatusCode::OK,
        json!({"status": "failed", "error": "unused"}),
    ))
    .await;
    let client = AnalysisClient::new(&service.url).unwrap();
    let file = video_file("holiday.avi");

    client.analyze(&file).await;

    let parts = service.received();
    assert_eq!(parts.len(), 1, "exactly one part expected: {:?}", parts);
    assert_eq!(parts[0].name.as_deref(), Some("file"));
    assert_eq!(parts[0].file_name.as_deref(), Some("holiday.avi"));
    assert_eq!(parts[0].content_type.as_deref(), Some("video/x-msvideo"));
    assert_eq!(parts[0].len as u64, file.size());
}

/// TC-CLIENT-003: Service-reported failure keeps its message
#[tokio::test]
async fn tc_client_003_service_failure_passthrough() {
    let service = MockService::start(MockReply::json(
        StatusCode::OK,
        json!({"status": "failed", "error": "No face detected in video"}),
    ))
    .await;
    let client = AnalysisClient::new(&service.url).unwrap();

    let response = client.analyze(&video_file("clip.avi")).await;

    assert_eq!(
        response,
        AnalysisResponse::failed("No face detected in video")
    );
}

/// TC-CLIENT-004: Non-2xx with `detail` uses the detail as message
#[tokio::test]
async fn tc_client_004_error_status_with_detail() {
    let service = MockService::start(MockReply::json(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({"detail": "Unsupported video codec"}),
    ))
    .await;
    let client = AnalysisClient::new(&service.url).unwrap();

    let response = client.analyze(&video_file("clip.avi")).await;

    assert_eq!(response.status, AnalysisStatus::Failed);
    assert!(response.result.is_none());
    assert_eq!(response.error.as_deref(), Some("Unsupported video codec"));
}

/// TC-CLIENT-005: Non-2xx without a body falls back to the status message
#[tokio::test]
async fn tc_client_005_error_status_without_body() {
    let service = MockService::start(MockReply::text(StatusCode::INTERNAL_SERVER_ERROR, "")).await;
    let client = AnalysisClient::new(&service.url).unwrap();

    let response = client.analyze(&video_file("clip.avi")).await;

    assert_eq!(
        response.error.as_deref(),
        Some("Upload failed with status 500")
    );
}

/// TC-CLIENT-006: Structured `detail` is rendered as JSON text
#[tokio::test]
async fn tc_client_006_structured_detail() {
    let service = MockService::start(MockReply::json(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({"detail": [{"loc": ["body", "file"], "msg": "field required"}]}),
    ))
    .await;
    let client = AnalysisClient::new(&service.url).unwrap();

    let response = client.analyze(&video_file("clip.avi")).await;

    let message = response.error.expect("error message");
    assert!(message.contains("field required"), "got {}", message);
}

/// TC-CLIENT-007: Connection failure becomes a network error
#[tokio::test]
async fn tc_client_007_connection_refused() {
    let client = AnalysisClient::new(&unreachable_url().await).unwrap();

    let response = client.analyze(&video_file("clip.avi")).await;

    assert_eq!(response.status, AnalysisStatus::Failed);
    let message = response.error.expect("error message");
    assert!(
        message.starts_with("Network error occurred"),
        "unexpected message: {}",
        message
    );
}

/// TC-CLIENT-008: Unparseable success body becomes a failure
#[tokio::test]
async fn tc_client_008_unparseable_body() {
    let service = MockService::start(MockReply::text(StatusCode::OK, "<html>oops</html>")).await;
    let client = AnalysisClient::new(&service.url).unwrap();

    let response = client.analyze(&video_file("clip.avi")).await;

    assert_eq!(response.status, AnalysisStatus::Failed);
    assert!(response
        .error
        .expect("error message")
        .starts_with("Invalid response from analysis service"));
}

/// TC-CLIENT-009: Completed response without a result normalizes to malformed
#[tokio::test]
async fn tc_client_009_completed_without_result() {
    let service = MockService::start(MockReply::json(
        StatusCode::OK,
        json!({"status": "completed"}),
    ))
    .await;
    let client = AnalysisClient::new(&service.url).unwrap();

    let outcome = client.analyze(&video_file("clip.avi")).await.into_outcome();

    assert_eq!(outcome.unwrap_err().message, "Malformed analysis response");
}
