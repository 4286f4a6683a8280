//! voxear-flow library interface
//!
//! Upload → Analyze → Results workflow for a remote deepfake analysis
//! service. Exposes public APIs for the `voxear` binary and integration tests.

pub mod app;
pub mod config;
pub mod error;
pub mod handoff;
pub mod models;
pub mod navigation;
pub mod render;
pub mod screens;
pub mod services;
pub mod session;

pub use crate::app::{RunReport, Workflow};
pub use crate::error::{FlowError, FlowResult};

use crate::config::{FlowConfig, FlowTiming};
use crate::handoff::ResultHandoff;
use crate::services::{AnalysisClient, Analyzer};
use crate::session::SessionState;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use voxear_common::events::EventBus;

/// Application state shared by the screens of one workflow session
#[derive(Clone)]
pub struct AppState {
    /// Selected file for the current run
    pub session: SessionState,
    /// Analysis → results handoff
    pub handoff: ResultHandoff,
    /// Event bus driving the progress display
    pub event_bus: EventBus,
    /// Remote analysis service
    pub analyzer: Arc<dyn Analyzer>,
    /// Analysis screen timing
    pub timing: FlowTiming,
    /// Session start timestamp
    pub startup_time: DateTime<Utc>,
    /// Last workflow error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn Analyzer>, event_bus: EventBus, timing: FlowTiming) -> Self {
        Self {
            session: SessionState::new(),
            handoff: ResultHandoff::in_memory(),
            event_bus,
            analyzer,
            timing,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Build state talking to the configured HTTP service
    pub fn from_config(config: &FlowConfig) -> FlowResult<Self> {
        let client = AnalysisClient::new(&config.service_url)?;
        tracing::info!(endpoint = %client.endpoint(), "Analysis service configured");
        Ok(Self::new(
            Arc::new(client),
            EventBus::new(config.event_capacity),
            config.timing,
        ))
    }

    pub async fn set_last_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }
}
