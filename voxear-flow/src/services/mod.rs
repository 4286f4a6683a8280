//! Services for the analysis workflow

pub mod analysis_client;
pub mod analysis_controller;
pub mod progress_simulator;
pub mod reconciliation;

pub use analysis_client::{AnalysisClient, Analyzer};
pub use analysis_controller::{AnalysisController, AnalysisExit};
pub use progress_simulator::{ProgressSimulator, SimulatorHandle, SimulatorTick};
pub use reconciliation::{summarize, ProgressSummary, StepBoard, IDLE_LABEL, SKIPPED_ANNOTATION};
