use std::time::Duration;

use super::state::{ExitReason, PlaybackEffect, PlaybackState, PlaybackStatus};

/// Segment sequencing state machine.
///
/// Time inside a segment is kept as an exact `Duration` so accumulated ticks reach
/// the segment duration without float drift; `progress` is derived from it.
#[derive(Debug, Clone)]
pub struct PlaybackMachine {
    status: PlaybackStatus,
    index: usize,
    elapsed: Duration,
    segment_count: usize,
    segment_duration: Duration,
}

impl PlaybackMachine {
    pub fn new(segment_count: usize, segment_duration: Duration) -> Self {
        let status = if segment_count == 0 {
            PlaybackStatus::NotFound
        } else {
            PlaybackStatus::Playing
        };

        Self {
            status,
            index: 0,
            elapsed: Duration::ZERO,
            segment_count,
            segment_duration,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match self.status {
            PlaybackStatus::Playing => PlaybackState::Playing {
                index: self.index,
                progress: self.progress(),
            },
            PlaybackStatus::Paused => PlaybackState::Paused {
                index: self.index,
                progress: self.progress(),
            },
            PlaybackStatus::Exited => PlaybackState::Exited,
            PlaybackStatus::NotFound => PlaybackState::NotFound,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn segment_duration(&self) -> Duration {
        self.segment_duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        if self.is_active() {
            self.segment_duration.saturating_sub(self.elapsed)
        } else {
            Duration::ZERO
        }
    }

    fn progress(&self) -> f64 {
        if self.segment_duration.is_zero() {
            return 1.0;
        }
        let fraction = self.elapsed.as_secs_f64() / self.segment_duration.as_secs_f64();
        fraction.clamp(0.0, 1.0)
    }

    /// Fill level of each segment's progress bar: shown segments full, the active one
    /// partial, upcoming ones empty.
    pub fn progress_bars(&self) -> Vec<f64> {
        let progress = self.progress();
        (0..self.segment_count)
            .map(|i| {
                if !self.is_active() {
                    0.0
                } else if i < self.index {
                    1.0
                } else if i == self.index {
                    progress
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn is_active(&self) -> bool {
        matches!(self.status, PlaybackStatus::Playing | PlaybackStatus::Paused)
    }

    fn enter(&mut self, index: usize) -> PlaybackEffect {
        self.status = PlaybackStatus::Playing;
        self.index = index;
        self.elapsed = Duration::ZERO;
        PlaybackEffect::SegmentEntered { index }
    }

    fn exit_with(&mut self, reason: ExitReason) -> PlaybackEffect {
        self.status = PlaybackStatus::Exited;
        self.elapsed = Duration::ZERO;
        PlaybackEffect::Exited(reason)
    }

    pub fn advance(&mut self) -> Option<PlaybackEffect> {
        if !self.is_active() {
            return None;
        }
        if self.index + 1 < self.segment_count {
            Some(self.enter(self.index + 1))
        } else {
            Some(self.exit_with(ExitReason::Finished))
        }
    }

    pub fn retreat(&mut self) -> Option<PlaybackEffect> {
        if !self.is_active() {
            return None;
        }
        if self.index > 0 {
            Some(self.enter(self.index - 1))
        } else {
            Some(self.exit_with(ExitReason::BeforeFirst))
        }
    }

    pub fn pause(&mut self) -> Option<PlaybackEffect> {
        if self.status != PlaybackStatus::Playing {
            return None;
        }
        self.status = PlaybackStatus::Paused;
        Some(PlaybackEffect::Paused {
            index: self.index,
            progress: self.progress(),
        })
    }

    /// Continues from the frozen progress; never restarts the segment.
    pub fn resume(&mut self) -> Option<PlaybackEffect> {
        if self.status != PlaybackStatus::Paused {
            return None;
        }
        self.status = PlaybackStatus::Playing;
        Some(PlaybackEffect::Resumed {
            index: self.index,
            progress: self.progress(),
        })
    }

    /// Credits clock time to the active segment and advances once it is used up.
    pub fn tick(&mut self, elapsed: Duration) -> Option<PlaybackEffect> {
        if self.status != PlaybackStatus::Playing {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(elapsed);
        if self.elapsed >= self.segment_duration {
            self.advance()
        } else {
            None
        }
    }

    /// A failed segment counts as fully shown. Reports for other segments are stale.
    pub fn media_failed(&mut self, index: usize) -> Option<PlaybackEffect> {
        if !self.is_active() || index != self.index {
            return None;
        }
        self.advance()
    }

    pub fn exit(&mut self) -> Option<PlaybackEffect> {
        match self.status {
            PlaybackStatus::Exited => None,
            _ => Some(self.exit_with(ExitReason::Closed)),
        }
    }
}
