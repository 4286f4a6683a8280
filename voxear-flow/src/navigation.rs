//! Screen navigation
//!
//! Tracks the active screen of the Upload → Analyze → Results workflow and
//! announces every change on the event bus.

use chrono::Utc;
use voxear_common::events::{EventBus, ScreenId, VoxearEvent};

/// Screen router for one workflow session
pub struct Navigator {
    current: Option<ScreenId>,
    history: Vec<ScreenId>,
    event_bus: EventBus,
}

impl Navigator {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            current: None,
            history: Vec::new(),
            event_bus,
        }
    }

    /// Switch to `to` and emit `ScreenChanged`
    ///
    /// Navigating to the screen that is already active is still recorded.
    pub fn navigate(&mut self, to: ScreenId) {
        let from = self.current.replace(to);
        self.history.push(to);

        tracing::info!(
            from = from.map(|s| s.path()).unwrap_or("-"),
            to = to.path(),
            "Navigate"
        );
        self.event_bus.emit_lossy(VoxearEvent::ScreenChanged {
            from,
            to,
            timestamp: Utc::now(),
        });
    }

    /// Active screen, `None` before the first navigation
    pub fn current(&self) -> Option<ScreenId> {
        self.current
    }

    /// Every screen entered, oldest first
    pub fn history(&self) -> &[ScreenId] {
        &self.history
    }

    /// How many times `screen` has been entered
    pub fn count(&self, screen: ScreenId) -> usize {
        self.history.iter().filter(|s| **s == screen).count()
    }
}
