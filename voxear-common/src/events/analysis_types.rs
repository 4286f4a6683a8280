//! Analysis workflow type definitions
//!
//! Supporting types for analysis progress events.

use serde::{Deserialize, Serialize};

/// Screens of the three-stage workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenId {
    /// File selection ("Upload")
    Selection,
    /// Analysis in progress ("Analyze")
    Analysis,
    /// Verdict display ("Results")
    Results,
}

impl ScreenId {
    /// Route path of the screen
    pub fn path(&self) -> &'static str {
        match self {
            ScreenId::Selection => "/upload",
            ScreenId::Analysis => "/analyze",
            ScreenId::Results => "/results",
        }
    }

    /// Stepper label
    pub fn label(&self) -> &'static str {
        match self {
            ScreenId::Selection => "Upload",
            ScreenId::Analysis => "Analyze",
            ScreenId::Results => "Results",
        }
    }

    /// 1-based position in the Upload → Analyze → Results stepper
    pub fn position(&self) -> u8 {
        match self {
            ScreenId::Selection => 1,
            ScreenId::Analysis => 2,
            ScreenId::Results => 3,
        }
    }
}

/// Analysis controller state machine
///
/// ENTERING → SIMULATING → AWAITING_RESULT → FINALIZING → {NAVIGATING, FAILED}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisPhase {
    /// Checking for a selected file
    Entering,
    /// Request in flight, simulated progress advancing
    Simulating,
    /// Simulation exhausted, waiting for the service
    AwaitingResult,
    /// Merged state held visible before leaving the screen
    Finalizing,
    /// Result stored, moving to the results screen
    Navigating,
    /// Run failed; error shown with a single recovery action
    Failed,
}

impl AnalysisPhase {
    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisPhase::Navigating | AnalysisPhase::Failed)
    }
}

/// Display status of one progress step after merging both status channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Not reached yet
    Pending,
    /// Currently shown as in progress
    Current,
    /// Finished (simulated or reported)
    Completed,
    /// Reported by the service as not used for this file
    Skipped,
    /// Reported by the service as failed
    Failed,
}

/// One row of the progress card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Step id (correlation key with the service's step list)
    pub id: u32,
    /// Display title
    pub title: String,
    /// Merged display status
    pub status: StepStatus,
    /// Extra annotation (e.g. "module not used")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}
