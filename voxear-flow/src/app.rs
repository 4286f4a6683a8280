//! Whole-workflow driver
//!
//! Walks one file through Upload → Analyze → Results using the screens, the
//! same way a user would: choose, analyze, then read the results.

use crate::error::FlowResult;
use crate::navigation::Navigator;
use crate::screens::{
    analysis, results, AnalysisScreenExit, FailedView, ResultsEntry, ResultsView, SelectionScreen,
};
use crate::services::AnalysisController;
use crate::AppState;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use voxear_common::events::ScreenId;

/// How a workflow run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    /// Results screen rendered
    Completed(ResultsView),
    /// Analysis failed; the screen offers "try again"
    Failed(FailedView),
    /// Torn down before completion
    Cancelled,
    /// A screen found nothing to work with and sent the user to selection
    Redirected,
}

/// One workflow session
pub struct Workflow {
    state: AppState,
    navigator: Navigator,
    selection: SelectionScreen,
}

impl Workflow {
    pub fn new(state: AppState) -> Self {
        let navigator = Navigator::new(state.event_bus.clone());
        Self {
            state,
            navigator,
            selection: SelectionScreen::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Select `path` and run it through analysis and results
    ///
    /// Selection errors (unreadable, empty or non-video files) are returned
    /// as errors; analysis failures are reported as [`RunReport::Failed`].
    pub async fn run(&mut self, path: &Path, cancel: CancellationToken) -> FlowResult<RunReport> {
        if self.navigator.current() != Some(ScreenId::Selection) {
            self.navigator.navigate(ScreenId::Selection);
        }

        if let Err(e) = self.selection.choose(path) {
            self.state.set_last_error(e.to_string()).await;
            return Err(e);
        }
        self.selection
            .analyze(&self.state.session, &mut self.navigator)
            .await;

        self.analyze(cancel).await
    }

    /// Enter the analysis screen with whatever the session holds
    pub async fn analyze(&mut self, cancel: CancellationToken) -> FlowResult<RunReport> {
        let controller = AnalysisController::new(
            self.state.analyzer.clone(),
            self.state.session.clone(),
            self.state.handoff.clone(),
            self.state.event_bus.clone(),
            self.state.timing,
        );

        let report = match analysis::enter(controller, &mut self.navigator, cancel).await {
            AnalysisScreenExit::Completed { .. } => {
                match results::enter(&self.state.handoff, &mut self.navigator) {
                    ResultsEntry::Render(view) => RunReport::Completed(view),
                    ResultsEntry::Redirected => RunReport::Redirected,
                }
            }
            AnalysisScreenExit::Failed(view) => {
                self.state.set_last_error(view.message()).await;
                RunReport::Failed(view)
            }
            AnalysisScreenExit::Redirected => RunReport::Redirected,
            AnalysisScreenExit::TornDown => RunReport::Cancelled,
        };
        Ok(report)
    }

    /// "Try again" from a failed run: clear the file and go back to selection
    pub async fn try_again(&mut self, failed: &FailedView) {
        self.selection.reset();
        failed
            .try_again(&self.state.session, &mut self.navigator)
            .await;
    }
}
