//! Data models for the analysis workflow

pub mod analysis_result;
pub mod analysis_run;
pub mod session_file;
pub mod steps;

pub use analysis_result::{
    AnalysisResponse, AnalysisResult, AnalysisStatus, Confidence, Label, RemoteStep,
    RemoteStepStatus, WorkflowError,
};
pub use analysis_run::{AnalysisPhase, AnalysisRun, PhaseTransition};
pub use session_file::{format_size, SessionFile};
pub use steps::{default_steps, LocalStepStatus, StepDescriptor};
