//! Analysis run state machine
//!
//! ENTERING → SIMULATING → AWAITING_RESULT → FINALIZING → {NAVIGATING, FAILED}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use voxear_common::events::AnalysisPhase;

/// State transition record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub run_id: Uuid,
    pub old_state: AnalysisPhase,
    pub new_state: AnalysisPhase,
    pub transitioned_at: DateTime<Utc>,
}

/// In-memory bookkeeping for one analysis screen instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    /// Unique run identifier
    pub run_id: Uuid,

    /// Current controller state
    pub phase: AnalysisPhase,

    /// Run start time
    pub started_at: DateTime<Utc>,

    /// Run end time (set on terminal states)
    pub ended_at: Option<DateTime<Utc>>,
}

impl AnalysisRun {
    /// Create a run in the ENTERING state
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            phase: AnalysisPhase::Entering,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Whether `new_state` is reachable from the current state
    pub fn can_transition_to(&self, new_state: AnalysisPhase) -> bool {
        use AnalysisPhase::*;
        matches!(
            (self.phase, new_state),
            (Entering, Simulating)
                | (Simulating, AwaitingResult)
                | (Simulating, Failed)
                | (AwaitingResult, Finalizing)
                | (AwaitingResult, Failed)
                | (Finalizing, Navigating)
                | (Finalizing, Failed)
        )
    }

    /// Transition to new state
    ///
    /// Invalid transitions are logged and still applied; the controller is
    /// the only caller and its loop only requests legal moves.
    pub fn transition_to(&mut self, new_state: AnalysisPhase) -> PhaseTransition {
        if !self.can_transition_to(new_state) {
            tracing::warn!(
                run_id = %self.run_id,
                from = ?self.phase,
                to = ?new_state,
                "Unexpected analysis state transition"
            );
        }

        let transition = PhaseTransition {
            run_id: self.run_id,
            old_state: self.phase,
            new_state,
            transitioned_at: Utc::now(),
        };
        self.phase = new_state;

        if new_state.is_terminal() {
            self.ended_at = Some(Utc::now());
        }

        transition
    }

    /// Check if run is terminal (finished)
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

impl Default for AnalysisRun {
    fn default() -> Self {
        Self::new()
    }
}
