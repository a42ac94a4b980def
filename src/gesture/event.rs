use serde::{Deserialize, Serialize};

use crate::compose::OverlayId;
use crate::geometry::Point;

/// Normalized pointer input, timestamped in milliseconds on the caller's clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PointerEvent {
    Down { x: f64, y: f64, at_ms: u64 },
    Move { x: f64, y: f64, at_ms: u64 },
    Up { x: f64, y: f64, at_ms: u64 },
    /// The platform took the pointer away (e.g. a system gesture).
    Cancel { at_ms: u64 },
}

impl PointerEvent {
    pub fn at_ms(&self) -> u64 {
        match *self {
            PointerEvent::Down { at_ms, .. }
            | PointerEvent::Move { at_ms, .. }
            | PointerEvent::Up { at_ms, .. }
            | PointerEvent::Cancel { at_ms } => at_ms,
        }
    }

    pub fn point(&self) -> Option<Point> {
        match *self {
            PointerEvent::Down { x, y, .. }
            | PointerEvent::Move { x, y, .. }
            | PointerEvent::Up { x, y, .. } => Some(Point::new(x, y)),
            PointerEvent::Cancel { .. } => None,
        }
    }
}

/// What a gesture means, addressed either to playback or to the overlay canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureCommand {
    Advance,
    Retreat,
    Pause,
    Resume,
    NextStory,
    PreviousStory,
    BeginDrag { overlay_id: OverlayId, pointer: Point },
    UpdateDrag { pointer: Point },
    CommitDrag,
    CancelDrag,
    RemoveOverlay { overlay_id: OverlayId },
}

impl GestureCommand {
    pub fn is_playback(&self) -> bool {
        matches!(
            self,
            GestureCommand::Advance
                | GestureCommand::Retreat
                | GestureCommand::Pause
                | GestureCommand::Resume
                | GestureCommand::NextStory
                | GestureCommand::PreviousStory
        )
    }
}
