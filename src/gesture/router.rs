use crate::compose::OverlayId;
use crate::geometry::{Point, Size};
use crate::settings::ViewerSettings;

use super::event::{GestureCommand, PointerEvent};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Finds the overlay under a point, if any.
pub trait HitTest {
    fn overlay_at(&self, point: Point) -> Option<OverlayId>;
}

/// A surface without overlays, such as the story viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareSurface;

impl HitTest for BareSurface {
    fn overlay_at(&self, _point: Point) -> Option<OverlayId> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub surface: Size,
    pub swipe_threshold: f64,
    pub tap_slop: f64,
    pub long_press_ms: u64,
}

impl From<&ViewerSettings> for GestureConfig {
    fn from(settings: &ViewerSettings) -> Self {
        Self {
            surface: settings.surface,
            swipe_threshold: settings.swipe_threshold,
            tap_slop: settings.tap_slop,
            long_press_ms: settings.long_press_ms,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    started_at_ms: u64,
    target: Option<OverlayId>,
    moved: bool,
    long_pressed: bool,
}

/// Turns a pointer stream into playback and canvas commands.
///
/// Only the one press in progress is remembered, so that a release can be paired
/// with its press: a release within `tap_slop` of the press point is a tap, anything
/// farther is a swipe. A press held still for `long_press_ms` becomes a long-press,
/// which removes the overlay under it or, on the background, pauses playback until
/// released.
#[derive(Debug, Clone)]
pub struct GestureRouter {
    config: GestureConfig,
    press: Option<Press>,
}

impl GestureRouter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// When the current press turns into a long-press if it stays put.
    pub fn long_press_deadline(&self) -> Option<u64> {
        self.press
            .filter(|press| !press.moved && !press.long_pressed)
            .map(|press| press.started_at_ms + self.config.long_press_ms)
    }

    pub fn handle(&mut self, event: PointerEvent, surface: &impl HitTest) -> Vec<GestureCommand> {
        match event {
            PointerEvent::Down { x, y, at_ms } => self.on_down(Point::new(x, y), at_ms, surface),
            PointerEvent::Move { x, y, at_ms } => self.on_move(Point::new(x, y), at_ms),
            PointerEvent::Up { x, y, at_ms } => self.on_up(Point::new(x, y), at_ms),
            PointerEvent::Cancel { .. } => self.on_cancel(),
        }
    }

    /// Fires a pending long-press once the press has been held long enough.
    pub fn poll(&mut self, now_ms: u64) -> Vec<GestureCommand> {
        let long_press_ms = self.config.long_press_ms;
        let Some(press) = self.press.as_mut() else {
            return Vec::new();
        };
        if press.moved
            || press.long_pressed
            || now_ms.saturating_sub(press.started_at_ms) < long_press_ms
        {
            return Vec::new();
        }

        press.long_pressed = true;
        match press.target {
            Some(overlay_id) => {
                log_info!("long-press on overlay {}", overlay_id);
                vec![
                    GestureCommand::CancelDrag,
                    GestureCommand::RemoveOverlay { overlay_id },
                ]
            }
            None => vec![GestureCommand::Pause],
        }
    }

    fn on_down(&mut self, point: Point, at_ms: u64, surface: &impl HitTest) -> Vec<GestureCommand> {
        if self.press.is_some() {
            // Second pointer while one is down: ignored.
            return Vec::new();
        }

        let target = surface.overlay_at(point);
        self.press = Some(Press {
            origin: point,
            started_at_ms: at_ms,
            target,
            moved: false,
            long_pressed: false,
        });

        match target {
            Some(overlay_id) => vec![GestureCommand::BeginDrag {
                overlay_id,
                pointer: point,
            }],
            None => Vec::new(),
        }
    }

    fn on_move(&mut self, point: Point, at_ms: u64) -> Vec<GestureCommand> {
        let mut commands = self.poll(at_ms);
        let tap_slop = self.config.tap_slop;
        let Some(press) = self.press.as_mut() else {
            return commands;
        };

        if (point - press.origin).length() > tap_slop {
            press.moved = true;
        }
        if press.target.is_some() && !press.long_pressed {
            commands.push(GestureCommand::UpdateDrag { pointer: point });
        }
        commands
    }

    fn on_up(&mut self, point: Point, at_ms: u64) -> Vec<GestureCommand> {
        let mut commands = self.poll(at_ms);
        let Some(press) = self.press.take() else {
            return commands;
        };

        let moved = press.moved || (point - press.origin).length() > self.config.tap_slop;

        match (press.target, press.long_pressed) {
            (None, true) => commands.push(GestureCommand::Resume),
            (Some(_), true) => {}
            (Some(_), false) => {
                commands.push(GestureCommand::UpdateDrag { pointer: point });
                commands.push(GestureCommand::CommitDrag);
            }
            (None, false) if !moved => {
                if point.x < self.config.surface.width / 2.0 {
                    commands.push(GestureCommand::Retreat);
                } else {
                    commands.push(GestureCommand::Advance);
                }
            }
            (None, false) => {
                let dx = point.x - press.origin.x;
                if dx > self.config.swipe_threshold {
                    commands.push(GestureCommand::PreviousStory);
                } else if dx < -self.config.swipe_threshold {
                    commands.push(GestureCommand::NextStory);
                }
            }
        }
        commands
    }

    fn on_cancel(&mut self) -> Vec<GestureCommand> {
        match self.press.take() {
            Some(Press {
                target: Some(_),
                long_pressed: false,
                ..
            }) => vec![GestureCommand::CancelDrag],
            Some(Press {
                target: None,
                long_pressed: true,
                ..
            }) => vec![GestureCommand::Resume],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct OneOverlay {
        id: OverlayId,
    }

    impl HitTest for OneOverlay {
        fn overlay_at(&self, point: Point) -> Option<OverlayId> {
            (point.x < 100.0 && point.y < 100.0).then_some(self.id)
        }
    }

    fn router() -> GestureRouter {
        GestureRouter::new(GestureConfig::from(&ViewerSettings::default()))
    }

    fn down(x: f64, y: f64, at_ms: u64) -> PointerEvent {
        PointerEvent::Down { x, y, at_ms }
    }

    fn mv(x: f64, y: f64, at_ms: u64) -> PointerEvent {
        PointerEvent::Move { x, y, at_ms }
    }

    fn up(x: f64, y: f64, at_ms: u64) -> PointerEvent {
        PointerEvent::Up { x, y, at_ms }
    }

    #[test]
    fn tap_left_half_retreats_and_right_half_advances() {
        let mut r = router();
        r.handle(down(50.0, 400.0, 0), &BareSurface);
        assert_eq!(r.handle(up(52.0, 401.0, 80), &BareSurface), vec![GestureCommand::Retreat]);

        r.handle(down(300.0, 400.0, 200), &BareSurface);
        assert_eq!(r.handle(up(300.0, 400.0, 260), &BareSurface), vec![GestureCommand::Advance]);
    }

    #[test]
    fn swipes_beyond_threshold_navigate_stories() {
        let mut r = router();
        r.handle(down(100.0, 400.0, 0), &BareSurface);
        r.handle(mv(140.0, 400.0, 30), &BareSurface);
        assert_eq!(
            r.handle(up(160.0, 405.0, 60), &BareSurface),
            vec![GestureCommand::PreviousStory]
        );

        r.handle(down(300.0, 400.0, 100), &BareSurface);
        assert_eq!(
            r.handle(up(240.0, 400.0, 150), &BareSurface),
            vec![GestureCommand::NextStory]
        );
    }

    #[test]
    fn drag_under_swipe_threshold_is_a_noop() {
        let mut r = router();
        r.handle(down(200.0, 400.0, 0), &BareSurface);
        r.handle(mv(230.0, 420.0, 40), &BareSurface);
        assert!(r.handle(up(240.0, 420.0, 90), &BareSurface).is_empty());
        assert!(!r.is_pressed());
    }

    #[test]
    fn exactly_threshold_is_not_a_swipe() {
        let mut r = router();
        r.handle(down(100.0, 400.0, 0), &BareSurface);
        assert!(r.handle(up(150.0, 400.0, 60), &BareSurface).is_empty());
    }

    #[test]
    fn long_press_pauses_and_release_resumes() {
        let mut r = router();
        r.handle(down(200.0, 400.0, 0), &BareSurface);
        assert_eq!(r.long_press_deadline(), Some(500));
        assert!(r.poll(499).is_empty());
        assert_eq!(r.poll(500), vec![GestureCommand::Pause]);
        assert!(r.poll(900).is_empty());
        assert_eq!(r.long_press_deadline(), None);
        assert_eq!(r.handle(up(200.0, 400.0, 1500), &BareSurface), vec![GestureCommand::Resume]);
    }

    #[test]
    fn long_press_detected_at_release_without_polling() {
        let mut r = router();
        r.handle(down(200.0, 400.0, 0), &BareSurface);
        assert_eq!(
            r.handle(up(200.0, 400.0, 800), &BareSurface),
            vec![GestureCommand::Pause, GestureCommand::Resume]
        );
    }

    #[test]
    fn movement_cancels_pending_long_press() {
        let mut r = router();
        r.handle(down(200.0, 400.0, 0), &BareSurface);
        r.handle(mv(260.0, 400.0, 100), &BareSurface);
        assert!(r.poll(1000).is_empty());
    }

    #[test]
    fn cancel_after_long_press_resumes() {
        let mut r = router();
        r.handle(down(200.0, 400.0, 0), &BareSurface);
        r.poll(600);
        assert_eq!(
            r.handle(PointerEvent::Cancel { at_ms: 700 }, &BareSurface),
            vec![GestureCommand::Resume]
        );
    }

    #[test]
    fn press_on_overlay_drives_a_drag() {
        let surface = OneOverlay { id: Uuid::new_v4() };
        let mut r = router();

        assert_eq!(
            r.handle(down(10.0, 10.0, 0), &surface),
            vec![GestureCommand::BeginDrag {
                overlay_id: surface.id,
                pointer: Point::new(10.0, 10.0)
            }]
        );
        assert_eq!(
            r.handle(mv(40.0, 30.0, 50), &surface),
            vec![GestureCommand::UpdateDrag {
                pointer: Point::new(40.0, 30.0)
            }]
        );
        assert_eq!(
            r.handle(up(300.0, 30.0, 90), &surface),
            vec![
                GestureCommand::UpdateDrag {
                    pointer: Point::new(300.0, 30.0)
                },
                GestureCommand::CommitDrag
            ]
        );
    }

    #[test]
    fn long_press_on_overlay_removes_instead_of_pausing() {
        let surface = OneOverlay { id: Uuid::new_v4() };
        let mut r = router();
        r.handle(down(10.0, 10.0, 0), &surface);

        let commands = r.poll(500);
        assert_eq!(
            commands,
            vec![
                GestureCommand::CancelDrag,
                GestureCommand::RemoveOverlay {
                    overlay_id: surface.id
                }
            ]
        );
        assert!(commands.iter().all(|c| !c.is_playback()));
        assert!(r.handle(up(10.0, 10.0, 700), &surface).is_empty());
    }

    #[test]
    fn second_pointer_is_ignored() {
        let mut r = router();
        r.handle(down(50.0, 400.0, 0), &BareSurface);
        assert!(r.handle(down(300.0, 400.0, 10), &BareSurface).is_empty());
        assert_eq!(r.handle(up(50.0, 400.0, 40), &BareSurface), vec![GestureCommand::Retreat]);
    }

    #[test]
    fn pointer_events_deserialize_from_camel_case() {
        let event: PointerEvent =
            serde_json::from_str(r#"{ "type": "down", "x": 1.5, "y": 2.0, "atMs": 40 }"#).unwrap();
        assert_eq!(event, PointerEvent::Down { x: 1.5, y: 2.0, at_ms: 40 });
        assert_eq!(event.point(), Some(Point::new(1.5, 2.0)));
    }
}
