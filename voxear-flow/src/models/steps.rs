//! Step model: the locally displayed processing stages
//!
//! The catalogue is independent of the service's own step vocabulary. The
//! two lists are correlated by numeric id only; titles never are.

use serde::{Deserialize, Serialize};

/// One stage of the progress list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Ordinal id, ascending in display order
    pub id: u32,
    pub title: String,
    pub description: String,
}

impl StepDescriptor {
    pub fn new(id: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Status from the local simulation channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalStepStatus {
    Pending,
    Current,
    Completed,
}

/// Default catalogue shown on the analysis screen
pub fn default_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new(
            1,
            "Extracting video frames",
            "Decoding the upload and sampling frames for inspection.",
        ),
        StepDescriptor::new(
            2,
            "Detecting motion patterns",
            "Tracking faces and movement across consecutive frames.",
        ),
        StepDescriptor::new(
            3,
            "Running AI analysis",
            "Scoring frame sequences with the neural-network ensemble.",
        ),
        StepDescriptor::new(
            4,
            "Physics-based verification",
            "Checking lighting and motion for physically implausible artifacts.",
        ),
    ]
}
