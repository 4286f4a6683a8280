//! Terminal rendering of the workflow
//!
//! Pure formatting functions plus a renderer task that follows the event bus
//! and prints to stdout. Logs go to stderr, so the two never interleave on
//! the same stream.

use crate::models::format_size;
use crate::screens::{FailedView, FileCard, ResultsView};
use crate::services::summarize;
use std::io::Write;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use voxear_common::events::{EventBus, ScreenId, StepSnapshot, StepStatus, VoxearEvent};

const STEPPER: [ScreenId; 3] = [ScreenId::Selection, ScreenId::Analysis, ScreenId::Results];

/// Glyph for a step status
pub fn glyph(status: StepStatus) -> char {
    match status {
        StepStatus::Completed => '✓',
        StepStatus::Current => '●',
        StepStatus::Pending => '○',
        StepStatus::Skipped => '⊘',
        StepStatus::Failed => '✗',
    }
}

/// One line of the step list
pub fn step_line(step: &StepSnapshot) -> String {
    match &step.annotation {
        Some(note) => format!("  {} {} ({})", glyph(step.status), step.title, note),
        None => format!("  {} {}", glyph(step.status), step.title),
    }
}

/// Upload → Analyze → Results stepper with the active screen bracketed
///
/// ```
/// use voxear_common::events::ScreenId;
/// use voxear_flow::render::render_stepper;
///
/// assert_eq!(render_stepper(ScreenId::Analysis), " 1 Upload ──[2 Analyze]── 3 Results ");
/// ```
pub fn render_stepper(active: ScreenId) -> String {
    let parts: Vec<String> = STEPPER
        .iter()
        .map(|screen| {
            if *screen == active {
                format!("[{} {}]", screen.position(), screen.label())
            } else {
                format!(" {} {} ", screen.position(), screen.label())
            }
        })
        .collect();
    parts.join("──")
}

/// Progress card: current step, step counter, percentage and step list
pub fn render_progress(steps: &[StepSnapshot]) -> String {
    let summary = summarize(steps);
    let mut out = format!(
        "Current step: {}\nStep {} of {} ({}%)\n",
        summary.current_label, summary.active_step, summary.total_steps, summary.percent
    );
    for step in steps {
        out.push_str(&step_line(step));
        out.push('\n');
    }
    out
}

pub fn render_file_card(card: &FileCard) -> String {
    format!("{} ({})", card.name, card.size)
}

pub fn render_results(view: &ResultsView) -> String {
    format!(
        "{}\n\nDeepfake Probability: {}%\n{}\nConfidence Level: {}\n",
        view.title,
        view.percentage,
        view.headline.to_uppercase(),
        view.confidence
    )
}

pub fn render_failure(view: &FailedView) -> String {
    format!(
        "Analysis failed: {}\n[{}]\n",
        view.message(),
        FailedView::TRY_AGAIN
    )
}

/// Live renderer following the event bus
pub struct TerminalRenderer {
    rx: broadcast::Receiver<VoxearEvent>,
}

impl TerminalRenderer {
    /// Subscribe now; events emitted before this call are not shown
    pub fn new(event_bus: &EventBus) -> Self {
        Self {
            rx: event_bus.subscribe(),
        }
    }

    /// Print events until the bus closes or `stop` fires
    ///
    /// On `stop`, events already queued are still printed before the task
    /// exits.
    pub fn spawn(mut self, stop: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    received = self.rx.recv() => match received {
                        Ok(event) => print_event(&event),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Renderer lagged behind the event bus");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = stop.cancelled() => {
                        self.drain();
                        break;
                    }
                }
            }
        })
    }

    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => print_event(&event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer lagged behind the event bus");
                }
                Err(_) => break,
            }
        }
    }
}

fn print_event(event: &VoxearEvent) {
    if let Some(text) = render_event(event) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", text);
        let _ = stdout.flush();
    }
}

/// Text printed for one event, if any
pub fn render_event(event: &VoxearEvent) -> Option<String> {
    match event {
        VoxearEvent::ScreenChanged { to, .. } => Some(format!("\n{}\n", render_stepper(*to))),
        VoxearEvent::AnalysisStarted {
            file_name,
            file_size,
            ..
        } => {
            let card = FileCard {
                name: file_name.clone(),
                size: format_size(*file_size),
            };
            Some(format!("Analyzing {}\n", render_file_card(&card)))
        }
        VoxearEvent::StepAdvanced { steps, .. } => Some(format!("\n{}", render_progress(steps))),
        VoxearEvent::StepsReconciled { steps, skipped, .. } if !skipped.is_empty() => {
            Some(format!("\n{}", render_progress(steps)))
        }
        _ => None,
    }
}
