use thiserror::Error;

use super::overlay::OverlayId;

/// Why a canvas operation was rejected. A rejected operation changes nothing.
#[derive(Debug, Error, PartialEq)]
pub enum CanvasError {
    #[error("text overlay content is empty")]
    EmptyText,

    #[error("overlay not found: {0}")]
    UnknownOverlay(OverlayId),

    #[error("a drag is already active on overlay {0}")]
    DragAlreadyActive(OverlayId),

    #[error("no drag is active")]
    NoActiveDrag,
}

#[derive(Debug, Error, PartialEq)]
pub enum ShareError {
    #[error("a share is already in flight")]
    AlreadySharing,

    #[error("composition session is closed")]
    Closed,
}
