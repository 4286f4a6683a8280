//! Analysis orchestration controller
//!
//! Drives one analysis screen instance through
//! ENTERING → SIMULATING → AWAITING_RESULT → FINALIZING → {NAVIGATING, FAILED}.
//!
//! # Join policy
//! The request and the progress simulation run concurrently. Finalizing
//! waits for both: the request supplies the authoritative outcome, the
//! simulation supplies the visual cadence. A result that arrives early is
//! held until the (finite) simulation completes. AWAITING_RESULT is entered
//! as soon as the simulation is exhausted, whether or not the result is
//! already in hand. A failure ends the run immediately.
//!
//! # Ordering
//! All display mutations happen inside the single select loop of [`run`],
//! so steps only move forward and the service-reported merge always comes
//! after the simulation has settled every step.
//!
//! # Teardown
//! Cancelling the token passed to [`run`] (or dropping the future) stops
//! the simulator and the request task. Nothing is emitted, stored or
//! navigated after teardown.
//!
//! [`run`]: AnalysisController::run

use crate::config::FlowTiming;
use crate::handoff::{ResultHandoff, RESULT_KEY};
use crate::models::{
    default_steps, AnalysisPhase, AnalysisResult, AnalysisRun, StepDescriptor, WorkflowError,
};
use crate::services::analysis_client::Analyzer;
use crate::services::progress_simulator::ProgressSimulator;
use crate::services::reconciliation::StepBoard;
use crate::session::SessionState;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use voxear_common::events::{EventBus, StepSnapshot, VoxearEvent};

/// How an analysis screen instance ended
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisExit {
    /// No file was selected; go back to selection without an error
    RedirectToSelection,

    /// Result stored; go to the results screen
    NavigateToResults {
        run_id: Uuid,
        /// Step list as last displayed (after the merge)
        steps: Vec<StepSnapshot>,
    },

    /// Run failed; show the error with a "try again" action
    Failed {
        run_id: Uuid,
        error: WorkflowError,
        steps: Vec<StepSnapshot>,
    },

    /// Screen torn down before the run finished
    TornDown { run_id: Uuid },
}

/// Controller for one analysis screen instance
pub struct AnalysisController {
    analyzer: Arc<dyn Analyzer>,
    session: SessionState,
    handoff: ResultHandoff,
    event_bus: EventBus,
    timing: FlowTiming,
    steps: Vec<StepDescriptor>,
}

impl AnalysisController {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        session: SessionState,
        handoff: ResultHandoff,
        event_bus: EventBus,
        timing: FlowTiming,
    ) -> Self {
        Self {
            analyzer,
            session,
            handoff,
            event_bus,
            timing,
            steps: default_steps(),
        }
    }

    /// Run the state machine to a terminal outcome
    pub async fn run(self, cancel: CancellationToken) -> AnalysisExit {
        let mut run = AnalysisRun::new();
        let run_id = run.run_id;

        // ENTERING
        let Some(file) = self.session.get_file().await else {
            tracing::info!(
                run_id = %run_id,
                "No session file on analysis entry, redirecting to selection"
            );
            return AnalysisExit::RedirectToSelection;
        };

        // Child token shared by both tasks; cancelled on every exit path,
        // including the future being dropped.
        let tasks = cancel.child_token();
        let _tasks_guard = tasks.clone().drop_guard();

        let simulator = ProgressSimulator::new(self.steps.len(), self.timing.step_dwell);
        self.transition(&mut run, AnalysisPhase::Simulating);
        tracing::info!(
            run_id = %run_id,
            file = %file.name(),
            size = file.size(),
            simulated_ms = simulator.total_duration().as_millis() as u64,
            "Starting analysis"
        );
        self.event_bus.emit_lossy(VoxearEvent::AnalysisStarted {
            run_id,
            file_name: file.name().to_string(),
            file_size: file.size(),
            timestamp: Utc::now(),
        });

        // SIMULATING: request and simulation start together
        let analyzer = Arc::clone(&self.analyzer);
        let request_cancel = tasks.clone();
        let mut request = tokio::spawn(async move {
            tokio::select! {
                _ = request_cancel.cancelled() => None,
                response = analyzer.analyze(&file) => Some(response),
            }
        });

        let mut ticks = simulator.spawn(tasks.clone());
        let mut board = StepBoard::new(self.steps.clone());

        let timeout = self.timing.analysis_timeout;
        let deadline = async move {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut simulation_done = false;
        let mut settled: Option<AnalysisResult> = None;

        let result = loop {
            if simulation_done {
                if let Some(result) = settled.take() {
                    break result;
                }
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!(
                        run_id = %run_id,
                        phase = ?run.phase,
                        "Analysis screen torn down"
                    );
                    return AnalysisExit::TornDown { run_id };
                }

                joined = &mut request, if settled.is_none() => {
                    let outcome = match joined {
                        Ok(Some(response)) => response.into_outcome(),
                        Ok(None) => {
                            // Request task saw cancellation before the parent loop did.
                            return AnalysisExit::TornDown { run_id };
                        }
                        Err(join_error) => {
                            tracing::error!(
                                run_id = %run_id,
                                error = %join_error,
                                "Analysis task ended unexpectedly"
                            );
                            Err(WorkflowError::unexpected())
                        }
                    };

                    match outcome {
                        Ok(result) => {
                            tracing::info!(
                                run_id = %run_id,
                                label = %result.label,
                                probability = result.probability,
                                simulation_done,
                                "Analysis result received"
                            );
                            self.event_bus.emit_lossy(VoxearEvent::AnalysisCompleted {
                                run_id,
                                label: result.label.to_string(),
                                probability: result.probability,
                                confidence: result.confidence.to_string(),
                                timestamp: Utc::now(),
                            });
                            settled = Some(result);
                        }
                        Err(error) => {
                            tasks.cancel();
                            return self.fail(&mut run, &board, error);
                        }
                    }
                }

                tick = ticks.recv(), if !simulation_done => {
                    match tick {
                        Some(tick) => {
                            if board.apply_tick(tick) {
                                self.event_bus.emit_lossy(VoxearEvent::StepAdvanced {
                                    run_id,
                                    current_step: board.current_step(),
                                    steps: board.snapshot(),
                                    timestamp: Utc::now(),
                                });
                            }
                        }
                        None => {
                            simulation_done = true;
                            self.transition(&mut run, AnalysisPhase::AwaitingResult);
                        }
                    }
                }

                _ = &mut deadline, if settled.is_none() => {
                    let secs = timeout.map(|t| t.as_secs()).unwrap_or_default();
                    tracing::warn!(
                        run_id = %run_id,
                        timeout_secs = secs,
                        "Analysis service did not respond in time"
                    );
                    tasks.cancel();
                    return self.fail(
                        &mut run,
                        &board,
                        WorkflowError::new(format!("Analysis timed out after {} seconds", secs)),
                    );
                }
            }
        };

        // Merge service-reported step statuses
        let skipped = board.merge_remote(result.remote_steps());
        self.event_bus.emit_lossy(VoxearEvent::StepsReconciled {
            run_id,
            skipped: skipped.clone(),
            steps: board.snapshot(),
            timestamp: Utc::now(),
        });
        if !skipped.is_empty() {
            tracing::info!(
                run_id = %run_id,
                skipped = ?skipped,
                "Service skipped analysis modules"
            );
        }

        // FINALIZING: keep the merged list visible for the grace interval
        self.transition(&mut run, AnalysisPhase::Finalizing);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(
                    run_id = %run_id,
                    "Analysis screen torn down during grace interval"
                );
                return AnalysisExit::TornDown { run_id };
            }
            _ = tokio::time::sleep(self.timing.grace) => {}
        }

        if let Err(e) = self.handoff.store(&result) {
            tracing::error!(run_id = %run_id, error = %e, "Failed to store analysis result");
            return self.fail(&mut run, &board, WorkflowError::unexpected());
        }
        self.event_bus.emit_lossy(VoxearEvent::ResultStored {
            run_id,
            key: RESULT_KEY.to_string(),
            timestamp: Utc::now(),
        });

        // The run is complete; the file is no longer needed.
        self.session.clear().await;

        self.transition(&mut run, AnalysisPhase::Navigating);
        AnalysisExit::NavigateToResults {
            run_id,
            steps: board.snapshot(),
        }
    }

    fn transition(&self, run: &mut AnalysisRun, new_state: AnalysisPhase) {
        let transition = run.transition_to(new_state);
        tracing::debug!(
            run_id = %transition.run_id,
            from = ?transition.old_state,
            to = ?transition.new_state,
            "Analysis state transition"
        );
        self.event_bus.emit_lossy(VoxearEvent::WorkflowStateChanged {
            run_id: transition.run_id,
            old_state: transition.old_state,
            new_state: transition.new_state,
            timestamp: transition.transitioned_at,
        });
    }

    fn fail(&self, run: &mut AnalysisRun, board: &StepBoard, error: WorkflowError) -> AnalysisExit {
        tracing::warn!(run_id = %run.run_id, error = %error, "Analysis failed");
        self.transition(run, AnalysisPhase::Failed);
        self.event_bus.emit_lossy(VoxearEvent::AnalysisFailed {
            run_id: run.run_id,
            message: error.message.clone(),
            timestamp: Utc::now(),
        });
        AnalysisExit::Failed {
            run_id: run.run_id,
            error,
            steps: board.snapshot(),
        }
    }
}
