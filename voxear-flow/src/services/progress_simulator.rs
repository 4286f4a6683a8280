//! Simulated step progress
//!
//! Advances through the step list at a fixed dwell per step, independent of
//! the real request. The first step becomes current immediately; after each
//! dwell the current step is completed and the next one becomes current.
//! The tick channel closes once every step has been completed.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One forward move of the simulation (indices into the step list)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorTick {
    /// Step that just finished, if any
    pub completed: Option<usize>,
    /// Step now in progress, if any steps remain
    pub current: Option<usize>,
}

/// Running simulation
pub struct SimulatorHandle {
    ticks: mpsc::Receiver<SimulatorTick>,
}

impl SimulatorHandle {
    /// Next tick; `None` once the sequence is exhausted or cancelled
    pub async fn recv(&mut self) -> Option<SimulatorTick> {
        self.ticks.recv().await
    }
}

/// Fixed-cadence progress simulator
///
/// Not restartable: `spawn` consumes it. A new run builds a new simulator.
#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    step_count: usize,
    dwell: Duration,
}

impl ProgressSimulator {
    pub fn new(step_count: usize, dwell: Duration) -> Self {
        Self { step_count, dwell }
    }

    /// Total simulated duration
    pub fn total_duration(&self) -> Duration {
        self.dwell * self.step_count as u32
    }

    /// Start the timer task
    ///
    /// The task stops early when `cancel` fires or the handle is dropped.
    pub fn spawn(self, cancel: CancellationToken) -> SimulatorHandle {
        let (tx, rx) = mpsc::channel(self.step_count.max(1) + 1);
        tokio::spawn(self.run(tx, cancel));
        SimulatorHandle { ticks: rx }
    }

    async fn run(self, tx: mpsc::Sender<SimulatorTick>, cancel: CancellationToken) {
        if self.step_count == 0 {
            return;
        }

        let first = SimulatorTick {
            completed: None,
            current: Some(0),
        };
        if tx.send(first).await.is_err() {
            return;
        }

        for index in 0..self.step_count {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(step = index, "Progress simulation cancelled");
                    return;
                }
                _ = tokio::time::sleep(self.dwell) => {}
            }

            let next = index + 1;
            let tick = SimulatorTick {
                completed: Some(index),
                current: (next < self.step_count).then_some(next),
            };
            if tx.send(tick).await.is_err() {
                // Receiver gone: the owning screen was torn down.
                return;
            }
        }

        tracing::debug!(steps = self.step_count, "Progress simulation finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_in_order_with_fixed_dwell() {
        let dwell = Duration::from_millis(500);
        let mut handle = ProgressSimulator::new(3, dwell).spawn(CancellationToken::new());
        let start = Instant::now();

        let mut ticks = Vec::new();
        while let Some(tick) = handle.recv().await {
            ticks.push((tick, start.elapsed()));
        }

        let expected = [
            (None, Some(0), 0),
            (Some(0), Some(1), 500),
            (Some(1), Some(2), 1000),
            (Some(2), None, 1500),
        ];
        assert_eq!(ticks.len(), expected.len());
        for ((tick, at), (completed, current, ms)) in ticks.iter().zip(expected) {
            assert_eq!(tick.completed, completed);
            assert_eq!(tick.current, current);
            assert_eq!(*at, Duration::from_millis(ms));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let cancel = CancellationToken::new();
        let mut handle = ProgressSimulator::new(4, Duration::from_secs(1)).spawn(cancel.clone());

        assert_eq!(handle.recv().await.unwrap().current, Some(0));
        cancel.cancel();
        assert!(handle.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_step_list_closes_immediately() {
        let simulator = ProgressSimulator::new(0, Duration::from_secs(1));
        let mut handle = simulator.spawn(CancellationToken::new());
        assert!(handle.recv().await.is_none());
    }

    #[test]
    fn test_total_duration() {
        let sim = ProgressSimulator::new(4, Duration::from_millis(250));
        assert_eq!(sim.total_duration(), Duration::from_secs(1));
    }
}
