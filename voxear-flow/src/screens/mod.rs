//! Workflow screens: Upload → Analyze → Results

pub mod analysis;
pub mod results;
pub mod selection;

pub use analysis::{AnalysisScreenExit, FailedView};
pub use results::{ResultsEntry, ResultsView};
pub use selection::{load_file, FileCard, SelectionScreen};
