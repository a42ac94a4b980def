pub mod canvas;
pub mod drag;
pub mod error;
pub mod overlay;
pub mod session;

pub use canvas::OverlayCanvas;
pub use drag::DragSession;
pub use error::{CanvasError, ShareError};
pub use overlay::{
    FontWeight, Overlay, OverlayId, OverlayKind, TextColor, DEFAULT_STICKER_SIZE,
    DEFAULT_TEXT_SIZE, STICKER_GLYPHS,
};
pub use session::{CapturedMedia, CompositionSession, SharePayload, UploadCollaborator};
