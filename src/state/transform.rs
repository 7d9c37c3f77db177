/// Full-screen viewer transform
///
/// Holds the zoom, pan and rotation applied to the full-screen image and
/// the rules for folding a gesture update into it. Only the scale is
/// bounded; offset and rotation accumulate freely.

use cgmath::{Deg, Vector2, Zero};

/// Allowed zoom range, always with `min <= 1 <= max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
}

impl ScaleBounds {
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self { min: 0.5, max: 5.0 }
    }
}

/// One incremental update from a transform gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformGesture {
    /// Centre of the pointers, in window coordinates
    pub centroid: Vector2<f32>,
    /// Movement of the centroid since the last update
    pub pan: Vector2<f32>,
    /// Multiplicative zoom since the last update (1.0 = unchanged)
    pub zoom: f32,
    /// Rotation since the last update, in degrees
    pub rotation: f32,
}

impl TransformGesture {
    pub fn pan(centroid: Vector2<f32>, pan: Vector2<f32>) -> Self {
        Self {
            centroid,
            pan,
            zoom: 1.0,
            rotation: 0.0,
        }
    }

    pub fn zoom(centroid: Vector2<f32>, zoom: f32) -> Self {
        Self {
            centroid,
            pan: Vector2::zero(),
            zoom,
            rotation: 0.0,
        }
    }

    pub fn rotate(centroid: Vector2<f32>, rotation: f32) -> Self {
        Self {
            centroid,
            pan: Vector2::zero(),
            zoom: 1.0,
            rotation,
        }
    }
}

/// Zoom, pan and rotation of the full-screen image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerTransform {
    pub scale: f32,
    pub offset: Vector2<f32>,
    pub rotation: Deg<f32>,
    bounds: ScaleBounds,
}

impl ViewerTransform {
    /// Fresh transform: unit scale, no offset, the given starting rotation
    pub fn new(bounds: ScaleBounds, rotation: Deg<f32>) -> Self {
        Self {
            scale: 1.0,
            offset: Vector2::zero(),
            rotation,
            bounds,
        }
    }

    /// Fold one gesture update in.
    ///
    /// The pan is multiplied by the already-updated scale, so dragging a
    /// zoomed-in image moves it proportionally further.
    pub fn apply(&mut self, gesture: &TransformGesture) {
        // NaN zoom would poison the scale permanently
        if gesture.zoom.is_finite() && gesture.zoom > 0.0 {
            self.scale = self.bounds.clamp(self.scale * gesture.zoom);
        }
        self.offset += gesture.pan * self.scale;
        self.rotation += Deg(gesture.rotation);
    }

    /// Back to unit scale and no offset. Rotation is left alone.
    pub fn reset_zoom_and_pan(&mut self) {
        self.scale = 1.0;
        self.offset = Vector2::zero();
    }
}
