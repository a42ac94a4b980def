use std::time::Duration;

use tokio::time::Instant;

/// Anchor-based progress clock.
///
/// It only measures: each `lap` reports the time since the previous lap (or since
/// `start`), and the playback machine decides what that time means. A stopped clock
/// has no anchor and reports nothing.
#[derive(Debug, Clone, Default)]
pub struct ProgressClock {
    running_anchor: Option<Instant>,
}

impl ProgressClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running_anchor.is_some()
    }

    /// Starts (or re-anchors) the clock at `now`.
    pub fn start(&mut self, now: Instant) {
        self.running_anchor = Some(now);
    }

    pub fn lap(&mut self, now: Instant) -> Duration {
        match self.running_anchor {
            Some(anchor) => {
                self.running_anchor = Some(now);
                now.saturating_duration_since(anchor)
            }
            None => Duration::ZERO,
        }
    }

    /// Stops the clock, returning the time not yet reported.
    pub fn stop(&mut self, now: Instant) -> Duration {
        let pending = self.lap(now);
        self.running_anchor = None;
        pending
    }
}
