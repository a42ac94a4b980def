use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Exited,
    NotFound,
}

/// Externally visible playback state.
///
/// `progress` is the fraction of the active segment already shown, in `0.0..=1.0`.
/// `NotFound` is the terminal state of a viewer opened on an empty timeline and is
/// distinct from `Exited`, which means the viewer was left.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PlaybackState {
    Playing { index: usize, progress: f64 },
    Paused { index: usize, progress: f64 },
    Exited,
    NotFound,
}

impl PlaybackState {
    pub fn status(&self) -> PlaybackStatus {
        match self {
            PlaybackState::Playing { .. } => PlaybackStatus::Playing,
            PlaybackState::Paused { .. } => PlaybackStatus::Paused,
            PlaybackState::Exited => PlaybackStatus::Exited,
            PlaybackState::NotFound => PlaybackStatus::NotFound,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            PlaybackState::Playing { index, .. } | PlaybackState::Paused { index, .. } => {
                Some(*index)
            }
            PlaybackState::Exited | PlaybackState::NotFound => None,
        }
    }

    pub fn progress(&self) -> f64 {
        match self {
            PlaybackState::Playing { progress, .. } | PlaybackState::Paused { progress, .. } => {
                *progress
            }
            PlaybackState::Exited | PlaybackState::NotFound => 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackState::Exited | PlaybackState::NotFound)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ExitReason {
    /// Advanced past the last segment.
    Finished,
    /// Retreated before the first segment.
    BeforeFirst,
    /// Closed explicitly by the viewer.
    Closed,
}

/// What a transition did, for the controller to turn into side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEffect {
    SegmentEntered { index: usize },
    Paused { index: usize, progress: f64 },
    Resumed { index: usize, progress: f64 },
    Exited(ExitReason),
}
