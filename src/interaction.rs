//! Gesture handling for the globe.
//!
//! Two independent gesture streams drive the same view state:
//! - pan (mouse drag or one-finger touch) rotates the globe
//! - pinch and wheel change the zoom scale
//!
//! Every handler returns `true` when the view changed and the country
//! shapes must be re-projected.

use crate::state::{Rotation, ZoomState};
use geo_types::Coord;

/// Degrees of rotation per pixel of drag at zoom 1.
pub const PAN_SENSITIVITY: f64 = 0.25;

/// Exponent factor applied to wheel deltas (pixels): one notch of ~100 px
/// changes the scale by 2^0.2.
pub const WHEEL_SENSITIVITY: f64 = 0.002;

/// Interaction controller state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    /// Cumulative pan translation seen at the previous tick.
    pan_baseline: Option<Coord<f64>>,
    /// Zoom scale captured when the pinch began.
    pinch_baseline: Option<f64>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_panning(&self) -> bool {
        self.pan_baseline.is_some()
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch_baseline.is_some()
    }

    /// Starts a pan; the accumulated-delta baseline resets to zero.
    pub fn pan_start(&mut self) {
        self.pan_start_at(Coord { x: 0.0, y: 0.0 });
    }

    /// Starts a pan partway through a pointer gesture, e.g. a drag that
    /// continues after a pinch. `total` is the translation already seen, so
    /// only motion from here on rotates the globe.
    pub fn pan_start_at(&mut self, total: Coord<f64>) {
        self.pan_baseline = Some(total);
    }

    /// Applies a pan tick.
    ///
    /// `total` is the cumulative translation since the gesture began. The
    /// increment since the previous tick rotates the globe, scaled down by
    /// the square root of the zoom so rotation slows when zoomed in.
    /// Dragging down increases the view's latitude (pitch decreases).
    pub fn pan_move(&mut self, total: Coord<f64>, rotation: &mut Rotation, zoom: &ZoomState) -> bool {
        let previous = *self.pan_baseline.get_or_insert(Coord { x: 0.0, y: 0.0 });
        self.pan_baseline = Some(total);

        let dx = total.x - previous.x;
        let dy = total.y - previous.y;
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }

        let factor = PAN_SENSITIVITY / zoom.scale().sqrt();
        rotation.rotate_by(dx * factor, -dy * factor);
        true
    }

    pub fn pan_end(&mut self) {
        self.pan_baseline = None;
    }

    /// Starts a pinch, capturing the current scale as the baseline.
    pub fn pinch_start(&mut self, zoom: &ZoomState) {
        self.pinch_baseline = Some(zoom.scale());
    }

    /// Applies a pinch tick. `ratio` is the finger-distance ratio relative to
    /// the start of the gesture.
    pub fn pinch_move(&mut self, ratio: f64, zoom: &mut ZoomState) -> bool {
        let baseline = *self.pinch_baseline.get_or_insert(zoom.scale());
        set_scale(zoom, baseline * ratio)
    }

    pub fn pinch_end(&mut self) {
        self.pinch_baseline = None;
    }

    /// Applies a wheel tick. Positive `delta_y` (scrolling down) zooms out.
    pub fn wheel(&mut self, delta_y: f64, zoom: &mut ZoomState) -> bool {
        if delta_y == 0.0 {
            return false;
        }
        let k = zoom.scale() * 2f64.powf(-delta_y * WHEEL_SENSITIVITY);
        set_scale(zoom, k)
    }
}

fn set_scale(zoom: &mut ZoomState, k: f64) -> bool {
    let before = zoom.scale();
    zoom.set_scale(k);
    zoom.scale() != before
}
