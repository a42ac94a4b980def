//! Events the core emits to its collaborators: the renderer, the media player and
//! the navigation shell.

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::playback::{ExitReason, PlaybackSnapshot};
use crate::timeline::StorySegment;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ViewerEvent {
    /// A new segment became active; the renderer should show it.
    SegmentChanged {
        index: usize,
        total: usize,
        segment: StorySegment,
        age_label: String,
    },
    /// Video segments play from the beginning on every entry.
    StartMedia {
        segment_id: String,
        media_ref: String,
    },
    PlaybackStateChanged {
        snapshot: PlaybackSnapshot,
    },
    PlaybackHeartbeat {
        index: usize,
        progress: f64,
        remaining_ms: u64,
    },
    LikeToggled {
        segment_id: String,
        liked: bool,
    },
    /// The requested author has no segments; the shell should offer a way back.
    StoryNotFound {
        author_id: String,
    },
    /// The navigation shell should close the viewer.
    ViewerExited {
        reason: ExitReason,
    },
}

impl ViewerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::SegmentChanged { .. } => "segment-changed",
            ViewerEvent::StartMedia { .. } => "start-media",
            ViewerEvent::PlaybackStateChanged { .. } => "playback-state-changed",
            ViewerEvent::PlaybackHeartbeat { .. } => "playback-heartbeat",
            ViewerEvent::LikeToggled { .. } => "like-toggled",
            ViewerEvent::StoryNotFound { .. } => "story-not-found",
            ViewerEvent::ViewerExited { .. } => "viewer-exited",
        }
    }
}

/// Receiver side of the viewer's outputs.
pub trait ViewerEventSink: Send + Sync {
    fn emit(&self, event: ViewerEvent);
}

impl ViewerEventSink for UnboundedSender<ViewerEvent> {
    fn emit(&self, event: ViewerEvent) {
        // A dropped receiver means nobody renders anymore; events are fire-and-forget.
        let _ = self.send(event);
    }
}
