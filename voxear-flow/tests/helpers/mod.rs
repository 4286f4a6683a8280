//! Shared test helpers
//!
//! - A mock analysis service (axum) on an ephemeral port
//! - Stub analyzers with scripted timing for paused-clock tests
//! - A storage backend that counts writes

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use voxear_flow::config::FlowTiming;
use voxear_flow::handoff::{MemoryStorage, SessionStorage};
use voxear_flow::models::{
    AnalysisResponse, AnalysisResult, Confidence, Label, RemoteStep, RemoteStepStatus, SessionFile,
};
use voxear_flow::services::Analyzer;

// ========================================
// Fixtures
// ========================================

/// Minimal AVI header, enough for content sniffing
pub fn video_bytes() -> Vec<u8> {
    let mut bytes = b"RIFF\x24\x00\x00\x00AVI LIST".to_vec();
    bytes.resize(256, 0);
    bytes
}

pub fn video_file(name: &str) -> SessionFile {
    SessionFile::new(name, video_bytes()).with_mime_type("video/x-msvideo")
}

/// Timing used by the controller tests: 4 steps × 1.2 s, 1.5 s grace
pub fn test_timing() -> FlowTiming {
    FlowTiming {
        step_dwell: Duration::from_millis(1200),
        grace: Duration::from_millis(1500),
        analysis_timeout: Some(Duration::from_secs(300)),
    }
}

pub fn fake_result() -> AnalysisResult {
    AnalysisResult {
        label: Label::Fake,
        probability: 0.92,
        confidence: Confidence::High,
        steps: None,
    }
}

pub fn result_with_skipped_step(skipped: u32) -> AnalysisResult {
    let steps = (1..=4)
        .map(|id| RemoteStep {
            id,
            status: if id == skipped {
                RemoteStepStatus::Skipped
            } else {
                RemoteStepStatus::Completed
            },
        })
        .collect();
    AnalysisResult {
        label: Label::Real,
        probability: 0.08,
        confidence: Confidence::Medium,
        steps: Some(steps),
    }
}

// ========================================
// Stub analyzers
// ========================================

/// Returns a fixed response after a fixed delay (tokio time)
pub struct ScriptedAnalyzer {
    delay: Duration,
    response: AnalysisResponse,
    /// Calls started
    pub calls: AtomicUsize,
    /// Calls that ran to completion (not cancelled)
    pub finished: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn new(delay: Duration, response: AnalysisResponse) -> Arc<Self> {
        Arc::new(Self {
            delay,
            response,
            calls: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, _file: &SessionFile) -> AnalysisResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// Never answers
pub struct PendingAnalyzer;

#[async_trait]
impl Analyzer for PendingAnalyzer {
    async fn analyze(&self, _file: &SessionFile) -> AnalysisResponse {
        std::future::pending().await
    }
}

/// Panics after a delay
pub struct PanickingAnalyzer {
    pub delay: Duration,
}

#[async_trait]
impl Analyzer for PanickingAnalyzer {
    async fn analyze(&self, _file: &SessionFile) -> AnalysisResponse {
        tokio::time::sleep(self.delay).await;
        panic!("analyzer blew up");
    }
}

// ========================================
// Storage
// ========================================

/// Memory storage that counts writes and can refuse them
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl CountingStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_writes: true,
            ..Self::default()
        })
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionStorage for CountingStorage {
    fn set_item(&self, key: &str, value: &str) -> voxear_common::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(voxear_common::Error::Storage("quota exceeded".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key)
    }

    fn remove_item(&self, key: &str) {
        self.inner.remove_item(key)
    }
}

// ========================================
// Mock analysis service
// ========================================

/// One multipart part received by the mock service
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

/// Canned reply of the mock service
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub body: String,
    pub content_type: &'static str,
}

impl MockReply {
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "application/json",
        }
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "text/plain",
        }
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    received: Arc<Mutex<Vec<ReceivedPart>>>,
}

/// Running mock service; aborted on drop
pub struct MockService {
    pub url: String,
    received: Arc<Mutex<Vec<ReceivedPart>>>,
    task: JoinHandle<()>,
}

impl MockService {
    /// Serve `reply` for every `POST /analyze/`
    pub async fn start(reply: MockReply) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            received: Arc::clone(&received),
        };
        let app = Router::new()
            .route("/analyze/", post(analyze_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            received,
            task,
        }
    }

    pub fn received(&self) -> Vec<ReceivedPart> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn analyze_handler(State(state): State<MockState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        state.received.lock().unwrap().push(ReceivedPart {
            name,
            file_name,
            content_type,
            len,
        });
    }

    let reply = state.reply;
    (
        reply.status,
        [(axum::http::header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
        .into_response()
}

/// URL on which nothing is listening
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Count events by type name
pub fn count_by_type(events: &[voxear_common::events::VoxearEvent]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for event in events {
        *counts.entry(event.event_type().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Everything currently buffered on a receiver
pub fn drain(
    rx: &mut tokio::sync::broadcast::Receiver<voxear_common::events::VoxearEvent>,
) -> Vec<voxear_common::events::VoxearEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
