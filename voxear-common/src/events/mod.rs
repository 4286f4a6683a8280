//! Event types for the Voxear event system
//!
//! Provides shared event definitions and the EventBus used to drive the
//! progress display.

mod analysis_types;

pub use analysis_types::{AnalysisPhase, ScreenId, StepSnapshot, StepStatus};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Voxear event types
///
/// Events are broadcast via EventBus and can be serialized for display
/// or diagnostics. All events use this central enum for exhaustive matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VoxearEvent {
    /// Active screen changed
    ///
    /// Triggers:
    /// - Renderer: Redraw the Upload → Analyze → Results stepper
    ScreenChanged {
        /// Screen being left (None on first navigation)
        from: Option<ScreenId>,
        /// Screen being entered
        to: ScreenId,
        /// When navigation happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Analysis controller changed state
    WorkflowStateChanged {
        /// Workflow run UUID
        run_id: Uuid,
        /// State before transition
        old_state: AnalysisPhase,
        /// State after transition
        new_state: AnalysisPhase,
        /// When transition happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Analysis request launched
    AnalysisStarted {
        /// Workflow run UUID
        run_id: Uuid,
        /// Display name of the selected file
        file_name: String,
        /// File size in bytes
        file_size: u64,
        /// When the request was launched
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Simulated progress moved forward
    ///
    /// Triggers:
    /// - Renderer: Update progress card
    StepAdvanced {
        /// Workflow run UUID
        run_id: Uuid,
        /// Id of the step now shown as current (None once all are completed)
        current_step: Option<u32>,
        /// Full step list after the advance
        steps: Vec<StepSnapshot>,
        /// When the step advanced
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Service-reported step statuses merged into the display
    StepsReconciled {
        /// Workflow run UUID
        run_id: Uuid,
        /// Ids the service reported as skipped
        skipped: Vec<u32>,
        /// Full step list after the merge
        steps: Vec<StepSnapshot>,
        /// When the merge happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Service returned a verdict
    AnalysisCompleted {
        /// Workflow run UUID
        run_id: Uuid,
        /// "real" or "fake"
        label: String,
        /// Fake probability in [0, 1]
        probability: f64,
        /// "high", "medium" or "low"
        confidence: String,
        /// When the verdict arrived
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Run ended in the failed state
    AnalysisFailed {
        /// Workflow run UUID
        run_id: Uuid,
        /// User-visible message
        message: String,
        /// When the run failed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Result written to the session handoff
    ResultStored {
        /// Workflow run UUID
        run_id: Uuid,
        /// Storage key written
        key: String,
        /// When the result was stored
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl VoxearEvent {
    /// Event type name (matches the serde tag)
    pub fn event_type(&self) -> &str {
        match self {
            VoxearEvent::ScreenChanged { .. } => "ScreenChanged",
            VoxearEvent::WorkflowStateChanged { .. } => "WorkflowStateChanged",
            VoxearEvent::AnalysisStarted { .. } => "AnalysisStarted",
            VoxearEvent::StepAdvanced { .. } => "StepAdvanced",
            VoxearEvent::StepsReconciled { .. } => "StepsReconciled",
            VoxearEvent::AnalysisCompleted { .. } => "AnalysisCompleted",
            VoxearEvent::AnalysisFailed { .. } => "AnalysisFailed",
            VoxearEvent::ResultStored { .. } => "ResultStored",
        }
    }

    /// Run id for run-scoped events
    pub fn run_id(&self) -> Option<Uuid> {
        match self {
            VoxearEvent::ScreenChanged { .. } => None,
            VoxearEvent::WorkflowStateChanged { run_id, .. }
            | VoxearEvent::AnalysisStarted { run_id, .. }
            | VoxearEvent::StepAdvanced { run_id, .. }
            | VoxearEvent::StepsReconciled { run_id, .. }
            | VoxearEvent::AnalysisCompleted { run_id, .. }
            | VoxearEvent::AnalysisFailed { run_id, .. }
            | VoxearEvent::ResultStored { run_id, .. } => Some(*run_id),
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
///
/// # Examples
///
/// ```
/// use voxear_common::events::{EventBus, ScreenId, VoxearEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(VoxearEvent::ScreenChanged {
///     from: None,
///     to: ScreenId::Selection,
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<VoxearEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<VoxearEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: VoxearEvent,
    ) -> Result<usize, broadcast::error::SendError<VoxearEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: VoxearEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
