use crate::geometry::{Point, Size};
use crate::gesture::HitTest;

use super::{
    drag::DragSession,
    error::CanvasError,
    overlay::{Overlay, OverlayId, TextColor},
};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Overlays placed on one media item, plus at most one drag in progress.
///
/// While a drag is open the dragged overlay's stored position stays at its origin;
/// only `live_position` moves until the drag is committed.
#[derive(Debug, Clone)]
pub struct OverlayCanvas {
    surface: Size,
    overlays: Vec<Overlay>,
    drag: Option<DragSession>,
}

impl OverlayCanvas {
    pub fn new(surface: Size) -> Self {
        Self {
            surface,
            overlays: Vec::new(),
            drag: None,
        }
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|overlay| overlay.id == id)
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Where the overlay is drawn right now, including an uncommitted drag.
    pub fn live_position(&self, id: OverlayId) -> Option<Point> {
        match self.drag {
            Some(drag) if drag.overlay_id == id => Some(drag.live_position),
            _ => self.get(id).map(|overlay| overlay.position),
        }
    }

    pub fn add_text(
        &mut self,
        content: &str,
        color: TextColor,
        position: Option<Point>,
    ) -> Result<OverlayId, CanvasError> {
        if content.trim().is_empty() {
            log_warn!("ignoring empty text overlay");
            return Err(CanvasError::EmptyText);
        }

        let mut overlay = Overlay::text(content, color, Point::default());
        let origin = position.unwrap_or_else(|| self.centered_origin(&overlay));
        overlay.position = origin;
        let id = overlay.id;
        log_info!("added text overlay {} ({})", id, color.hex());
        self.overlays.push(overlay);
        Ok(id)
    }

    pub fn add_sticker(&mut self, glyph: &str, position: Option<Point>) -> OverlayId {
        let mut overlay = Overlay::sticker(glyph, Point::default());
        let origin = position.unwrap_or_else(|| self.centered_origin(&overlay));
        overlay.position = origin;
        let id = overlay.id;
        log_info!("added sticker overlay {} ({})", id, glyph);
        self.overlays.push(overlay);
        id
    }

    /// Top-left corner that puts the overlay's bounds in the middle of the surface.
    fn centered_origin(&self, overlay: &Overlay) -> Point {
        self.surface.center() - overlay.extent().center()
    }

    /// Removes the overlay if present. Removing the dragged overlay drops its drag.
    pub fn remove_overlay(&mut self, id: OverlayId) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|overlay| overlay.id != id);
        let removed = self.overlays.len() != before;

        if removed {
            if self.drag.is_some_and(|drag| drag.overlay_id == id) {
                self.drag = None;
            }
            log_info!("removed overlay {}", id);
        }
        removed
    }

    pub fn begin_drag(&mut self, id: OverlayId, pointer_origin: Point) -> Result<(), CanvasError> {
        if let Some(drag) = self.drag {
            log_warn!("drag on {} rejected, {} is being dragged", id, drag.overlay_id);
            return Err(CanvasError::DragAlreadyActive(drag.overlay_id));
        }
        let Some(origin) = self.get(id).map(|overlay| overlay.position) else {
            log_warn!("drag rejected for unknown overlay {}", id);
            return Err(CanvasError::UnknownOverlay(id));
        };

        self.drag = Some(DragSession::new(id, origin, pointer_origin));
        Ok(())
    }

    pub fn update_drag(&mut self, pointer_current: Point) -> Result<Point, CanvasError> {
        let drag = self.drag.as_mut().ok_or(CanvasError::NoActiveDrag)?;
        Ok(drag.update(pointer_current))
    }

    pub fn commit_drag(&mut self) -> Result<Point, CanvasError> {
        let drag = self.drag.take().ok_or(CanvasError::NoActiveDrag)?;
        let overlay = self
            .overlays
            .iter_mut()
            .find(|overlay| overlay.id == drag.overlay_id)
            .ok_or(CanvasError::UnknownOverlay(drag.overlay_id))?;

        overlay.position = drag.live_position;
        log_info!(
            "moved overlay {} to ({:.1}, {:.1})",
            drag.overlay_id,
            drag.live_position.x,
            drag.live_position.y
        );
        Ok(drag.live_position)
    }

    pub fn cancel_drag(&mut self) -> Result<Point, CanvasError> {
        let drag = self.drag.take().ok_or(CanvasError::NoActiveDrag)?;
        Ok(drag.origin_position)
    }
}

impl HitTest for OverlayCanvas {
    /// Topmost (most recently added) overlay under the point.
    fn overlay_at(&self, point: Point) -> Option<OverlayId> {
        self.overlays
            .iter()
            .rev()
            .find(|overlay| {
                let position = self.live_position(overlay.id).unwrap_or(overlay.position);
                overlay.bounds_at(position).contains(point)
            })
            .map(|overlay| overlay.id)
    }
}
