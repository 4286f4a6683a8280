//! Results screen ("Results")
//!
//! Reads the stored result once. Without one, the screen sends the user back
//! to selection instead of rendering.

use crate::handoff::ResultHandoff;
use crate::models::{AnalysisResult, Label};
use crate::navigation::Navigator;
use voxear_common::events::ScreenId;

pub const TITLE: &str = "Analysis Complete: The video has been processed.";
pub const FAKE_HEADLINE: &str = "Deepfake Detected";
pub const REAL_HEADLINE: &str = "Likely Real Video";

/// Rendered fields of the results screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub title: &'static str,
    /// "real" or "fake"
    pub label: String,
    /// Fake probability as a whole percentage
    pub percentage: u32,
    pub headline: &'static str,
    /// Confidence as displayed (upper-case)
    pub confidence: String,
}

impl ResultsView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let headline = match result.label {
            Label::Fake => FAKE_HEADLINE,
            Label::Real => REAL_HEADLINE,
        };
        Self {
            title: TITLE,
            label: result.label.to_string(),
            percentage: result.percentage(),
            headline,
            confidence: result.confidence.to_string().to_uppercase(),
        }
    }
}

/// Outcome of entering the results screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsEntry {
    Render(ResultsView),
    Redirected,
}

/// Enter the results screen
pub fn enter(handoff: &ResultHandoff, navigator: &mut Navigator) -> ResultsEntry {
    match handoff.load() {
        Some(result) => ResultsEntry::Render(ResultsView::from_result(&result)),
        None => {
            tracing::info!("No stored analysis result, redirecting to selection");
            navigator.navigate(ScreenId::Selection);
            ResultsEntry::Redirected
        }
    }
}
