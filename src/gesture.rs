/// Pointer gesture recognition
///
/// Turns raw pointer events (mouse buttons, touch fingers, wheel) into the
/// two gestures the full-screen viewer understands: incremental transform
/// updates and double-taps. It knows nothing about iced, so the canvas
/// feeds it plain positions and timestamps.

use cgmath::{InnerSpace, Vector2, Zero};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::state::transform::TransformGesture;

/// Identifies one pointer. Touch fingers use their platform id.
pub type PointerId = u64;

/// Id used for the primary mouse button
pub const MOUSE_POINTER: PointerId = u64::MAX;

/// Spans below this are too small to derive a zoom or angle from
const MIN_SPAN: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed {
        id: PointerId,
        position: Vector2<f32>,
        at: Instant,
    },
    Moved {
        id: PointerId,
        position: Vector2<f32>,
    },
    Released {
        id: PointerId,
        at: Instant,
    },
    /// Finger vanished without a proper release
    Lost {
        id: PointerId,
    },
    /// Wheel scrolled by `lines`; `rotate` while the rotate modifier is held
    Wheel {
        position: Vector2<f32>,
        lines: f32,
        rotate: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Transform(TransformGesture),
    DoubleTap { position: Vector2<f32> },
}

/// Thresholds for gesture recognition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSettings {
    pub double_tap_timeout: Duration,
    /// Max movement for a press/release to still count as a tap
    pub touch_slop: f32,
    /// Max distance between the two taps of a double-tap
    pub double_tap_slop: f32,
    pub wheel_zoom_base: f32,
    pub wheel_rotation_step: f32,
}

impl GestureSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            double_tap_timeout: Duration::from_millis(config.double_tap_timeout_ms),
            wheel_zoom_base: config.wheel_zoom_base,
            wheel_rotation_step: config.wheel_rotation_step_degrees,
            ..Self::default()
        }
    }
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            double_tap_timeout: Duration::from_millis(300),
            touch_slop: 8.0,
            double_tap_slop: 40.0,
            wheel_zoom_base: 1.1,
            wheel_rotation_step: 15.0,
        }
    }
}

/// A press that may still turn out to be a tap
#[derive(Debug, Clone, Copy)]
struct TapCandidate {
    id: PointerId,
    start: Vector2<f32>,
    pressed_at: Instant,
    moved: bool,
}

#[derive(Debug, Clone)]
pub struct GestureDetector {
    settings: GestureSettings,
    pointers: BTreeMap<PointerId, Vector2<f32>>,
    candidate: Option<TapCandidate>,
    last_tap: Option<(Instant, Vector2<f32>)>,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(GestureSettings::default())
    }
}

impl GestureDetector {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            pointers: BTreeMap::new(),
            candidate: None,
            last_tap: None,
        }
    }

    /// Swap thresholds without dropping pointers in flight
    pub fn set_settings(&mut self, settings: GestureSettings) {
        self.settings = settings;
    }

    /// Number of pointers currently down
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        match event {
            PointerEvent::Pressed { id, position, at } => {
                self.pointers.insert(id, position);
                self.candidate = if self.pointers.len() == 1 {
                    Some(TapCandidate {
                        id,
                        start: position,
                        pressed_at: at,
                        moved: false,
                    })
                } else {
                    // A second pointer turns it into a multi-touch gesture
                    None
                };
                None
            }
            PointerEvent::Moved { id, position } => self.moved(id, position),
            PointerEvent::Released { id, at } => {
                self.pointers.remove(&id)?;
                let candidate = self.candidate.take().filter(|c| c.id == id)?;
                self.released_tap(candidate, at)
            }
            PointerEvent::Lost { id } => {
                self.pointers.remove(&id);
                if self.candidate.is_some_and(|c| c.id == id) {
                    self.candidate = None;
                }
                None
            }
            PointerEvent::Wheel {
                position,
                lines,
                rotate,
            } => {
                if lines == 0.0 || !lines.is_finite() {
                    return None;
                }
                let gesture = if rotate {
                    TransformGesture::rotate(position, lines * self.settings.wheel_rotation_step)
                } else {
                    TransformGesture::zoom(position, self.settings.wheel_zoom_base.powf(lines))
                };
                Some(GestureEvent::Transform(gesture))
            }
        }
    }

    fn moved(&mut self, id: PointerId, position: Vector2<f32>) -> Option<GestureEvent> {
        let before: Vec<Vector2<f32>> = self.pointers.values().copied().collect();
        *self.pointers.get_mut(&id)? = position;
        let after: Vec<Vector2<f32>> = self.pointers.values().copied().collect();

        if let Some(candidate) = self.candidate.as_mut().filter(|c| c.id == id) {
            if (position - candidate.start).magnitude() > self.settings.touch_slop {
                candidate.moved = true;
            }
        }

        let gesture = measure(&before, &after);
        let is_identity =
            gesture.pan == Vector2::zero() && gesture.zoom == 1.0 && gesture.rotation == 0.0;
        (!is_identity).then_some(GestureEvent::Transform(gesture))
    }

    fn released_tap(&mut self, candidate: TapCandidate, at: Instant) -> Option<GestureEvent> {
        let timeout = self.settings.double_tap_timeout;
        if candidate.moved || at.saturating_duration_since(candidate.pressed_at) > timeout {
            return None;
        }

        let position = candidate.start;
        match self.last_tap.take() {
            Some((previous_at, previous_position))
                if at.saturating_duration_since(previous_at) <= timeout
                    && (position - previous_position).magnitude()
                        <= self.settings.double_tap_slop =>
            {
                Some(GestureEvent::DoubleTap { position })
            }
            _ => {
                self.last_tap = Some((at, position));
                None
            }
        }
    }
}

/// Transform between two snapshots of the same pointers
fn measure(before: &[Vector2<f32>], after: &[Vector2<f32>]) -> TransformGesture {
    let centroid_before = centroid(before);
    let centroid_after = centroid(after);
    let pan = centroid_after - centroid_before;

    if after.len() < 2 {
        return TransformGesture::pan(centroid_after, pan);
    }

    let span_before = mean_span(before, centroid_before);
    let span_after = mean_span(after, centroid_after);
    let zoom = if span_before > MIN_SPAN && span_after > MIN_SPAN {
        span_after / span_before
    } else {
        1.0
    };

    let mut rotation = 0.0;
    let mut counted = 0;
    for (b, a) in before.iter().zip(after) {
        let from = *b - centroid_before;
        let to = *a - centroid_after;
        if from.magnitude() > MIN_SPAN && to.magnitude() > MIN_SPAN {
            let delta = to.y.atan2(to.x) - from.y.atan2(from.x);
            rotation += normalize_degrees(delta.to_degrees());
            counted += 1;
        }
    }
    if counted > 0 {
        rotation /= counted as f32;
    }

    TransformGesture {
        centroid: centroid_after,
        pan,
        zoom,
        rotation,
    }
}

fn centroid(points: &[Vector2<f32>]) -> Vector2<f32> {
    if points.is_empty() {
        return Vector2::zero();
    }
    points.iter().fold(Vector2::zero(), |sum, p| sum + *p) / points.len() as f32
}

fn mean_span(points: &[Vector2<f32>], center: Vector2<f32>) -> f32 {
    points.iter().map(|p| (*p - center).magnitude()).sum::<f32>() / points.len() as f32
}

/// Wrap into (-180, 180]
fn normalize_degrees(degrees: f32) -> f32 {
    let d = degrees % 360.0;
    if d > 180.0 {
        d - 360.0
    } else if d <= -180.0 {
        d + 360.0
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vector2<f32> {
        Vector2::new(x, y)
    }

    fn press(id: PointerId, position: Vector2<f32>, at: Instant) -> PointerEvent {
        PointerEvent::Pressed { id, position, at }
    }

    fn move_to(id: PointerId, position: Vector2<f32>) -> PointerEvent {
        PointerEvent::Moved { id, position }
    }

    fn transform(event: Option<GestureEvent>) -> TransformGesture {
        match event {
            Some(GestureEvent::Transform(t)) => t,
            other => panic!("expected a transform, got {other:?}"),
        }
    }

    fn tap(d: &mut GestureDetector, position: Vector2<f32>, at: Instant) -> Option<GestureEvent> {
        d.handle(press(MOUSE_POINTER, position, at));
        d.handle(PointerEvent::Released {
            id: MOUSE_POINTER,
            at: at + Duration::from_millis(40),
        })
    }

    #[test]
    fn test_single_pointer_drag_pans() {
        let mut d = GestureDetector::default();
        let now = Instant::now();
        d.handle(press(1, v(10.0, 10.0), now));

        let t = transform(d.handle(move_to(1, v(15.0, 7.0))));
        assert_eq!(t.pan, v(5.0, -3.0));
        assert_eq!(t.zoom, 1.0);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.centroid, v(15.0, 7.0));
    }

    #[test]
    fn test_pinch_zooms() {
        let mut d = GestureDetector::default();
        let now = Instant::now();
        d.handle(press(1, v(-10.0, 0.0), now));
        d.handle(press(2, v(10.0, 0.0), now));

        d.handle(move_to(1, v(-20.0, 0.0)));
        let t = transform(d.handle(move_to(2, v(20.0, 0.0))));
        // Second move: span 15 -> 20 around a centroid shifted by 5
        assert!((t.zoom - 20.0 / 15.0).abs() < 1e-5);
        assert!(t.rotation.abs() < 1e-4);
        assert_eq!(t.pan, v(5.0, 0.0));
    }

    #[test]
    fn test_symmetric_pinch() {
        let before = [v(-10.0, 0.0), v(10.0, 0.0)];
        let after = [v(-20.0, 0.0), v(20.0, 0.0)];
        let t = measure(&before, &after);
        assert_eq!(t.zoom, 2.0);
        assert_eq!(t.pan, Vector2::zero());
        assert!(t.rotation.abs() < 1e-4);
    }

    #[test]
    fn test_twist_rotates() {
        let before = [v(-10.0, 0.0), v(10.0, 0.0)];
        let after = [v(0.0, -10.0), v(0.0, 10.0)];
        let t = measure(&before, &after);
        assert!((t.rotation - 90.0).abs() < 1e-3, "rotation {}", t.rotation);
        assert!((t.zoom - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_pointer_moves_are_ignored() {
        let mut d = GestureDetector::default();
        assert!(d.handle(move_to(9, v(1.0, 1.0))).is_none());
    }

    #[test]
    fn test_double_tap() {
        let mut d = GestureDetector::default();
        let now = Instant::now();
        assert!(tap(&mut d, v(100.0, 100.0), now).is_none());
        let event = tap(&mut d, v(104.0, 98.0), now + Duration::from_millis(150));
        assert_eq!(event, Some(GestureEvent::DoubleTap { position: v(104.0, 98.0) }));
    }

    #[test]
    fn test_slow_taps_are_not_double() {
        let mut d = GestureDetector::default();
        let now = Instant::now();
        assert!(tap(&mut d, v(0.0, 0.0), now).is_none());
        assert!(tap(&mut d, v(0.0, 0.0), now + Duration::from_millis(800)).is_none());
        // The late tap starts a new sequence
        let event = tap(&mut d, v(0.0, 0.0), now + Duration::from_millis(900));
        assert!(matches!(event, Some(GestureEvent::DoubleTap { .. })));
    }

    #[test]
    fn test_distant_taps_are_not_double() {
        let mut d = GestureDetector::default();
        let now = Instant::now();
        tap(&mut d, v(0.0, 0.0), now);
        assert!(tap(&mut d, v(300.0, 0.0), now + Duration::from_millis(100)).is_none());
    }

    #[test]
    fn test_third_tap_starts_over() {
        let mut d = GestureDetector::default();
        let now = Instant::now();
        tap(&mut d, v(0.0, 0.0), now);
        assert!(tap(&mut d, v(0.0, 0.0), now + Duration::from_millis(100)).is_some());
        assert!(tap(&mut d, v(0.0, 0.0), now + Duration::from_millis(200)).is_none());
    }

    #[test]
    fn test_drag_is_not_a_tap() {
        let mut d = GestureDetector::default();
        let now = Instant::now();
        tap(&mut d, v(0.0, 0.0), now);

        d.handle(press(MOUSE_POINTER, v(0.0, 0.0), now));
        d.handle(move_to(MOUSE_POINTER, v(30.0, 0.0)));
        let released = d.handle(PointerEvent::Released {
            id: MOUSE_POINTER,
            at: now + Duration::from_millis(100),
        });
        assert!(released.is_none());
    }

    #[test]
    fn test_lost_finger_is_not_a_tap() {
        let mut d = GestureDetector::default();
        let now = Instant::now();
        d.handle(press(3, v(0.0, 0.0), now));
        d.handle(PointerEvent::Lost { id: 3 });
        assert_eq!(d.active_pointers(), 0);
        assert!(d.handle(PointerEvent::Released { id: 3, at: now }).is_none());
    }

    #[test]
    fn test_wheel() {
        let mut d = GestureDetector::default();
        let t = transform(d.handle(PointerEvent::Wheel {
            position: v(5.0, 5.0),
            lines: 2.0,
            rotate: false,
        }));
        assert!((t.zoom - 1.21).abs() < 1e-5);
        assert_eq!(t.rotation, 0.0);

        let t = transform(d.handle(PointerEvent::Wheel {
            position: v(5.0, 5.0),
            lines: -1.0,
            rotate: true,
        }));
        assert_eq!(t.zoom, 1.0);
        assert_eq!(t.rotation, -15.0);

        assert!(d
            .handle(PointerEvent::Wheel {
                position: v(0.0, 0.0),
                lines: 0.0,
                rotate: false,
            })
            .is_none());
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-270.0), 90.0);
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
    }
}
