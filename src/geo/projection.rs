//! Map projection and coordinate transformation.
//!
//! Converts geographic coordinates (lon/lat degrees) into view-space
//! coordinates under a rotated azimuthal equidistant projection.

use crate::state::{Rotation, ViewGeometry, ZoomState};
use geo_types::Coord;
use glam::DVec3;

/// Capability interface for a cartographic projection.
///
/// Coordinates are `x = longitude`, `y = latitude` in degrees on the
/// geographic side, and view-space pixels on the plane side.
pub trait ProjectionEngine {
    /// Projects a lon/lat point. Returns `None` when the result is not finite.
    fn project(&self, lon_lat: Coord<f64>) -> Option<Coord<f64>>;

    /// Inverse of [`ProjectionEngine::project`].
    fn invert(&self, point: Coord<f64>) -> Option<Coord<f64>>;
}

/// Azimuthal equidistant projection with a (yaw, pitch, roll) rotation.
#[derive(Debug, Clone)]
pub struct AzimuthalEquidistant {
    rotation: Rotation,
    /// Pixels per radian of great-circle distance from the center.
    scale: f64,
    /// View-space position of the projection center.
    translate: Coord<f64>,
}

impl AzimuthalEquidistant {
    pub fn new(rotation: Rotation, scale: f64, translate: Coord<f64>) -> Self {
        Self {
            rotation,
            scale,
            translate,
        }
    }

    /// Projection for the given view and current rotation/zoom.
    pub fn for_view(view: &ViewGeometry, rotation: Rotation, zoom: ZoomState) -> Self {
        Self::new(rotation, view.base_scale() * zoom.scale(), view.center())
    }

    /// Applies the rotation to a lon/lat pair in radians.
    fn rotate(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_radians(lambda + self.rotation.yaw.to_radians());
        let v = to_cartesian(lambda, phi);
        let v = rotate_y(v, self.rotation.pitch.to_radians());
        let v = rotate_x(v, self.rotation.roll.to_radians());
        to_spherical(v)
    }

    fn rotate_inverse(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let v = to_cartesian(lambda, phi);
        let v = rotate_x(v, -self.rotation.roll.to_radians());
        let v = rotate_y(v, -self.rotation.pitch.to_radians());
        let (lambda, phi) = to_spherical(v);
        (wrap_radians(lambda - self.rotation.yaw.to_radians()), phi)
    }
}

impl ProjectionEngine for AzimuthalEquidistant {
    fn project(&self, lon_lat: Coord<f64>) -> Option<Coord<f64>> {
        let (lambda, phi) = self.rotate(lon_lat.x.to_radians(), lon_lat.y.to_radians());

        let cos_c = (lambda.cos() * phi.cos()).clamp(-1.0, 1.0);
        let c = cos_c.acos();
        let k = if c == 0.0 { 1.0 } else { c / c.sin() };
        let x = k * phi.cos() * lambda.sin();
        let y = k * phi.sin();

        let point = Coord {
            x: self.translate.x + x * self.scale,
            y: self.translate.y - y * self.scale,
        };
        (point.x.is_finite() && point.y.is_finite()).then_some(point)
    }

    fn invert(&self, point: Coord<f64>) -> Option<Coord<f64>> {
        if self.scale == 0.0 {
            return None;
        }
        let x = (point.x - self.translate.x) / self.scale;
        let y = (self.translate.y - point.y) / self.scale;

        let z = (x * x + y * y).sqrt();
        let (sin_c, cos_c) = z.sin_cos();
        let lambda = (x * sin_c).atan2(z * cos_c);
        let phi = if z == 0.0 {
            y.asin()
        } else {
            (y * sin_c / z).clamp(-1.0, 1.0).asin()
        };

        let (lambda, phi) = self.rotate_inverse(lambda, phi);
        let lon_lat = Coord {
            x: lambda.to_degrees(),
            y: phi.to_degrees(),
        };
        (lon_lat.x.is_finite() && lon_lat.y.is_finite()).then_some(lon_lat)
    }
}

fn to_cartesian(lambda: f64, phi: f64) -> DVec3 {
    let cos_phi = phi.cos();
    DVec3::new(lambda.cos() * cos_phi, lambda.sin() * cos_phi, phi.sin())
}

fn to_spherical(v: DVec3) -> (f64, f64) {
    (v.y.atan2(v.x), v.z.clamp(-1.0, 1.0).asin())
}

/// Tilts the sphere so that a positive angle brings southern points
/// towards the center.
fn rotate_y(v: DVec3, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    DVec3::new(v.x * cos - v.z * sin, v.y, v.z * cos + v.x * sin)
}

fn rotate_x(v: DVec3, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    DVec3::new(v.x, v.y * cos - v.z * sin, v.z * cos + v.y * sin)
}

/// Wraps an angle into [-π, π].
fn wrap_radians(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    if angle.abs() <= PI {
        angle
    } else {
        angle - TAU * ((angle + PI) / TAU).floor()
    }
}
