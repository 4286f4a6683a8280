//! Step reconciliation
//!
//! Two status channels exist for each step: the local simulation
//! (pending/current/completed) and the service report
//! (completed/skipped/failed). The board keeps both and derives the display
//! status, with the service report taking precedence once present. Steps are
//! matched by id only.

use crate::models::{LocalStepStatus, RemoteStep, RemoteStepStatus, StepDescriptor};
use crate::services::progress_simulator::SimulatorTick;
use std::collections::HashMap;
use voxear_common::events::{StepSnapshot, StepStatus};

/// Annotation shown next to steps the service did not run
pub const SKIPPED_ANNOTATION: &str = "module not used";

/// Label shown when no step is current
pub const IDLE_LABEL: &str = "Processing";

/// Display state of the step list
#[derive(Debug, Clone)]
pub struct StepBoard {
    steps: Vec<StepDescriptor>,
    local: Vec<LocalStepStatus>,
    remote: HashMap<u32, RemoteStepStatus>,
}

impl StepBoard {
    pub fn new(steps: Vec<StepDescriptor>) -> Self {
        let local = vec![LocalStepStatus::Pending; steps.len()];
        Self {
            steps,
            local,
            remote: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply one simulator tick
    ///
    /// Local statuses only move forward; a tick that would regress a step is
    /// ignored for that step. Returns whether anything changed.
    pub fn apply_tick(&mut self, tick: SimulatorTick) -> bool {
        let mut changed = false;
        if let Some(index) = tick.completed {
            changed |= self.advance(index, LocalStepStatus::Completed);
        }
        if let Some(index) = tick.current {
            changed |= self.advance(index, LocalStepStatus::Current);
        }
        changed
    }

    fn advance(&mut self, index: usize, status: LocalStepStatus) -> bool {
        match self.local.get_mut(index) {
            Some(slot) if *slot < status => {
                *slot = status;
                true
            }
            Some(_) => false,
            None => {
                tracing::warn!(index, "Simulator tick for unknown step index");
                false
            }
        }
    }

    /// Merge service-reported statuses
    ///
    /// Ids missing from the local catalogue are ignored. Returns the ids now
    /// displayed as skipped, in display order.
    pub fn merge_remote(&mut self, reported: &[RemoteStep]) -> Vec<u32> {
        for step in reported {
            if self.steps.iter().any(|s| s.id == step.id) {
                self.remote.insert(step.id, step.status);
            } else {
                tracing::debug!(
                    id = step.id,
                    status = ?step.status,
                    "Ignoring unknown remote step id"
                );
            }
        }

        self.steps
            .iter()
            .filter(|s| self.is_skipped(s.id))
            .map(|s| s.id)
            .collect()
    }

    fn is_skipped(&self, id: u32) -> bool {
        self.remote.get(&id) == Some(&RemoteStepStatus::Skipped)
    }

    /// Merged display status of the step at `index`
    pub fn status_at(&self, index: usize) -> Option<StepStatus> {
        let descriptor = self.steps.get(index)?;
        let status = match self.remote.get(&descriptor.id) {
            Some(RemoteStepStatus::Skipped) => StepStatus::Skipped,
            Some(RemoteStepStatus::Failed) => StepStatus::Failed,
            Some(RemoteStepStatus::Completed) => StepStatus::Completed,
            None => match self.local[index] {
                LocalStepStatus::Pending => StepStatus::Pending,
                LocalStepStatus::Current => StepStatus::Current,
                LocalStepStatus::Completed => StepStatus::Completed,
            },
        };
        Some(status)
    }

    /// Merged display status by step id
    pub fn status_of(&self, id: u32) -> Option<StepStatus> {
        let index = self.steps.iter().position(|s| s.id == id)?;
        self.status_at(index)
    }

    /// Full step list for display
    pub fn snapshot(&self) -> Vec<StepSnapshot> {
        self.steps
            .iter()
            .enumerate()
            .filter_map(|(index, step)| {
                let status = self.status_at(index)?;
                Some(StepSnapshot {
                    id: step.id,
                    title: step.title.clone(),
                    status,
                    annotation: (status == StepStatus::Skipped)
                        .then(|| SKIPPED_ANNOTATION.to_string()),
                })
            })
            .collect()
    }

    /// Index of the step currently in progress
    pub fn current_index(&self) -> Option<usize> {
        (0..self.len()).find(|&i| self.status_at(i) == Some(StepStatus::Current))
    }

    /// Id of the step currently in progress
    pub fn current_step(&self) -> Option<u32> {
        self.current_index().map(|i| self.steps[i].id)
    }
}

/// Aggregates shown above the step list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    /// 1-based number of the active step (total when none is active)
    pub active_step: usize,
    pub total_steps: usize,
    /// Share of finished steps, rounded
    pub percent: u32,
    /// Title of the active step, or "Processing"
    pub current_label: String,
}

/// Summarize a step list the way the progress card shows it
///
/// Completed, skipped and failed steps all count as finished.
pub fn summarize(steps: &[StepSnapshot]) -> ProgressSummary {
    let total_steps = steps.len();
    let finished = steps
        .iter()
        .filter(|s| {
            matches!(
                s.status,
                StepStatus::Completed | StepStatus::Skipped | StepStatus::Failed
            )
        })
        .count();
    let active = steps.iter().position(|s| s.status == StepStatus::Current);

    let percent = if total_steps == 0 {
        0
    } else {
        ((finished as f64 / total_steps as f64) * 100.0).round() as u32
    };

    ProgressSummary {
        active_step: active.map(|i| i + 1).unwrap_or(total_steps),
        total_steps,
        percent,
        current_label: active
            .map(|i| steps[i].title.clone())
            .unwrap_or_else(|| IDLE_LABEL.to_string()),
    }
}
