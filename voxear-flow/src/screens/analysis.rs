//! Analysis screen ("Analyze")
//!
//! Runs one [`AnalysisController`] and performs the navigation its exit
//! calls for. A failed run stays on this screen with a single recovery
//! action.

use crate::models::WorkflowError;
use crate::navigation::Navigator;
use crate::services::{AnalysisController, AnalysisExit};
use crate::session::SessionState;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use voxear_common::events::{ScreenId, StepSnapshot};

/// Inline error state of the analysis screen
#[derive(Debug, Clone, PartialEq)]
pub struct FailedView {
    pub run_id: Uuid,
    pub error: WorkflowError,
    /// Step list as it was when the run failed
    pub steps: Vec<StepSnapshot>,
}

impl FailedView {
    /// Label of the recovery action
    pub const TRY_AGAIN: &'static str = "Try again";

    pub fn message(&self) -> &str {
        &self.error.message
    }

    /// Drop the selected file and return to selection
    pub async fn try_again(&self, session: &SessionState, navigator: &mut Navigator) {
        if let Some(file) = session.take_file().await {
            tracing::info!(
                run_id = %self.run_id,
                file = %file.name(),
                "Retrying from file selection"
            );
        }
        navigator.navigate(ScreenId::Selection);
    }
}

/// What happened on the analysis screen
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisScreenExit {
    /// Navigated to results
    Completed {
        run_id: Uuid,
        steps: Vec<StepSnapshot>,
    },
    /// Staying on the analysis screen with an error
    Failed(FailedView),
    /// Navigated back to selection (no file)
    Redirected,
    /// Screen torn down; nothing else happened
    TornDown,
}

/// Run the analysis screen to completion
pub async fn enter(
    controller: AnalysisController,
    navigator: &mut Navigator,
    cancel: CancellationToken,
) -> AnalysisScreenExit {
    match controller.run(cancel).await {
        AnalysisExit::RedirectToSelection => {
            navigator.navigate(ScreenId::Selection);
            AnalysisScreenExit::Redirected
        }
        AnalysisExit::NavigateToResults { run_id, steps } => {
            navigator.navigate(ScreenId::Results);
            AnalysisScreenExit::Completed { run_id, steps }
        }
        AnalysisExit::Failed {
            run_id,
            error,
            steps,
        } => AnalysisScreenExit::Failed(FailedView {
            run_id,
            error,
            steps,
        }),
        AnalysisExit::TornDown { .. } => AnalysisScreenExit::TornDown,
    }
}
