use crate::geometry::Point;

use super::overlay::OverlayId;

/// In-progress reposition of one overlay. Lives only while the pointer is down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub overlay_id: OverlayId,
    pub origin_position: Point,
    pub pointer_origin: Point,
    pub live_position: Point,
}

impl DragSession {
    pub fn new(overlay_id: OverlayId, origin_position: Point, pointer_origin: Point) -> Self {
        Self {
            overlay_id,
            origin_position,
            pointer_origin,
            live_position: origin_position,
        }
    }

    pub fn update(&mut self, pointer_current: Point) -> Point {
        let delta = pointer_current - self.pointer_origin;
        self.live_position = self.origin_position + delta;
        self.live_position
    }
}
