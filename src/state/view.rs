//! View state: rotation triple, zoom scale and the fixed viewport geometry.

use geo_types::Coord;
use std::f64::consts::FRAC_2_PI;

/// Smallest allowed zoom scale. Slightly above 0.5 so the whole sphere
/// just overflows the clip disk at maximum zoom-out.
pub const MIN_ZOOM: f64 = 0.5632;

/// Largest allowed zoom scale.
pub const MAX_ZOOM: f64 = 8.0;

// ============================================================================
// Rotation
// ============================================================================

/// Rotation triple in degrees.
///
/// The point at (-yaw, -pitch) is projected to the viewport center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Longitude rotation. Unbounded.
    pub yaw: f64,
    /// Latitude rotation, always within [-90, 90].
    pub pitch: f64,
    /// Always 0 for this map.
    pub roll: f64,
}

impl Rotation {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self {
            yaw,
            pitch: clamp_pitch(pitch),
            roll: 0.0,
        }
    }

    /// Adds a yaw/pitch increment, clamping pitch.
    pub fn rotate_by(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw += d_yaw;
        self.pitch = clamp_pitch(self.pitch + d_pitch);
    }
}

fn clamp_pitch(pitch: f64) -> f64 {
    if pitch.is_nan() {
        0.0
    } else {
        pitch.clamp(-90.0, 90.0)
    }
}

// ============================================================================
// Zoom
// ============================================================================

/// Zoom transform. Only the scale factor is carried; the viewport center
/// is the fixed point of every zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    k: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self { k: 1.0 }
    }
}

impl ZoomState {
    pub fn new(k: f64) -> Self {
        let mut zoom = Self::default();
        zoom.set_scale(k);
        zoom
    }

    pub fn scale(&self) -> f64 {
        self.k
    }

    /// Sets the scale, clamped to [`MIN_ZOOM`, `MAX_ZOOM`]. NaN is ignored.
    pub fn set_scale(&mut self, k: f64) {
        if k.is_nan() {
            return;
        }
        self.k = k.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

// ============================================================================
// View geometry
// ============================================================================

/// Fixed view-space dimensions of the drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ViewGeometry {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 960.0,
            padding: 40.0,
        }
    }
}

impl ViewGeometry {
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }

    /// Radius of the circular viewport.
    pub fn clip_radius(&self) -> f64 {
        self.width.min(self.height) / 2.0 - self.padding
    }

    /// Projection scale at zoom 1: one hemisphere fills the clip disk.
    pub fn base_scale(&self) -> f64 {
        self.clip_radius() * FRAC_2_PI
    }

    /// True when the view-space point lies inside the clip disk.
    pub fn contains(&self, point: Coord<f64>) -> bool {
        let c = self.center();
        let (dx, dy) = (point.x - c.x, point.y - c.y);
        dx * dx + dy * dy <= self.clip_radius() * self.clip_radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_is_clamped() {
        let mut rotation = Rotation::new(0.0, 120.0);
        assert_eq!(rotation.pitch, 90.0);

        rotation.rotate_by(0.0, -500.0);
        assert_eq!(rotation.pitch, -90.0);
    }

    #[test]
    fn test_yaw_is_unbounded() {
        let mut rotation = Rotation::default();
        rotation.rotate_by(1.0e12, 0.0);
        rotation.rotate_by(1.0e12, 0.0);
        assert_eq!(rotation.yaw, 2.0e12);
        assert_eq!(rotation.roll, 0.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        assert_eq!(ZoomState::new(100.0).scale(), MAX_ZOOM);
        assert_eq!(ZoomState::new(0.0).scale(), MIN_ZOOM);
        assert_eq!(ZoomState::new(f64::NEG_INFINITY).scale(), MIN_ZOOM);

        let mut zoom = ZoomState::new(2.0);
        zoom.set_scale(f64::NAN);
        assert_eq!(zoom.scale(), 2.0);
    }

    #[test]
    fn test_view_geometry_constants() {
        let view = ViewGeometry::default();
        assert_eq!(view.clip_radius(), 440.0);
        assert!((view.base_scale() * std::f64::consts::FRAC_PI_2 - 440.0).abs() < 1e-9);
        assert!(view.contains(view.center()));
        assert!(!view.contains(Coord { x: 0.0, y: 0.0 }));
    }
}
