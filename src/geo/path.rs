//! Path generation: projected country shapes, SVG path data and centroids.

use super::ProjectionEngine;
use geo_types::{Coord, LineString, MultiPolygon};
use std::fmt::Write as _;

/// A projected ring in view-space coordinates (not explicitly closed).
pub type Ring = Vec<Coord<f64>>;

/// A country boundary after projection: polygons, each an exterior ring
/// followed by its holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedShape {
    pub polygons: Vec<Vec<Ring>>,
}

impl ProjectedShape {
    /// Projects a geographic multipolygon.
    ///
    /// Points that do not project to finite coordinates are dropped. Rings
    /// left with fewer than three points are discarded, and a polygon whose
    /// exterior is discarded is dropped with its holes.
    pub fn project<P: ProjectionEngine>(projection: &P, geometry: &MultiPolygon<f64>) -> Self {
        let polygons = geometry
            .0
            .iter()
            .filter_map(|polygon| {
                let exterior = project_ring(projection, polygon.exterior())?;
                let mut rings = vec![exterior];
                rings.extend(
                    polygon
                        .interiors()
                        .iter()
                        .filter_map(|ring| project_ring(projection, ring)),
                );
                Some(rings)
            })
            .collect();

        Self { polygons }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// SVG path data: `M x,y L x,y ... Z` for every ring, two decimals.
    /// Empty shapes yield an empty string.
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        for ring in self.polygons.iter().flatten() {
            for (i, p) in ring.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{}{:.2},{:.2}", cmd, p.x, p.y);
            }
            d.push('Z');
        }
        d
    }

    /// Planar area-weighted centroid. Holes subtract from the area; a
    /// shape with zero area falls back to the mean of its vertices.
    pub fn centroid(&self) -> Option<Coord<f64>> {
        let mut area2 = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;

        for polygon in &self.polygons {
            for (index, ring) in polygon.iter().enumerate() {
                let (a, x, y) = ring_moments(ring);
                // Exterior and holes may come in either winding; orient
                // them so holes always subtract.
                let sign = if (index == 0) == (a >= 0.0) { 1.0 } else { -1.0 };
                area2 += sign * a;
                cx += sign * x;
                cy += sign * y;
            }
        }

        if area2.abs() > f64::EPSILON {
            return Some(Coord {
                x: cx / (3.0 * area2),
                y: cy / (3.0 * area2),
            });
        }

        let points: Vec<&Coord<f64>> = self.polygons.iter().flatten().flatten().collect();
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        Some(Coord {
            x: points.iter().map(|p| p.x).sum::<f64>() / n,
            y: points.iter().map(|p| p.y).sum::<f64>() / n,
        })
    }
}

fn project_ring<P: ProjectionEngine>(projection: &P, ring: &LineString<f64>) -> Option<Ring> {
    let mut points: Ring = ring
        .0
        .iter()
        .filter_map(|c| projection.project(*c))
        .collect();

    // The closing point duplicates the first; Z closes the ring instead.
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    (points.len() >= 3).then_some(points)
}

/// Twice the signed area and the first moments of a closed ring.
fn ring_moments(ring: &[Coord<f64>]) -> (f64, f64, f64) {
    let mut a = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;
    for (i, p0) in ring.iter().enumerate() {
        let p1 = ring[(i + 1) % ring.len()];
        let cross = p0.x * p1.y - p1.x * p0.y;
        a += cross;
        x += (p0.x + p1.x) * cross;
        y += (p0.y + p1.y) * cross;
    }
    (a, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::topology::{tests::two_country_fixture, Topology};
    use crate::geo::AzimuthalEquidistant;
    use crate::state::{Rotation, ViewGeometry, ZoomState};
    use geo_types::{polygon, Polygon};

    /// Identity "projection" for planar assertions.
    struct Planar;

    impl ProjectionEngine for Planar {
        fn project(&self, lon_lat: Coord<f64>) -> Option<Coord<f64>> {
            (lon_lat.x.is_finite() && lon_lat.y.is_finite()).then_some(lon_lat)
        }

        fn invert(&self, point: Coord<f64>) -> Option<Coord<f64>> {
            Some(point)
        }
    }

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ]
    }

    #[test]
    fn test_svg_path_format() {
        let shape = ProjectedShape::project(&Planar, &MultiPolygon(vec![square(0.0, 0.0, 1.5)]));
        assert_eq!(
            shape.to_svg_path(),
            "M0.00,0.00L1.50,0.00L1.50,1.50L0.00,1.50Z"
        );
    }

    #[test]
    fn test_centroid_with_hole() {
        let outer = square(0.0, 0.0, 4.0);
        let with_hole = Polygon::new(
            outer.exterior().clone(),
            vec![square(0.0, 0.0, 2.0).exterior().clone()],
        );
        let shape = ProjectedShape::project(&Planar, &MultiPolygon(vec![with_hole]));
        let c = shape.centroid().unwrap();

        // 16 - 4 area; hole pulls the centroid away from the origin.
        let expected = (16.0 * 2.0 - 4.0 * 1.0) / 12.0;
        assert!((c.x - expected).abs() < 1e-9);
        assert!((c.y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_geometry_is_empty() {
        let line = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (f64::NAN, 1.0), (0.0, 0.0)]),
            vec![],
        );
        let shape = ProjectedShape::project(&Planar, &MultiPolygon(vec![line]));
        assert!(shape.is_empty());
        assert_eq!(shape.to_svg_path(), "");
        assert_eq!(shape.centroid(), None);
    }

    #[test]
    fn test_paths_are_deterministic() {
        let render = || {
            let topology = Topology::from_slice(&two_country_fixture()).unwrap();
            let projection = AzimuthalEquidistant::for_view(
                &ViewGeometry::default(),
                Rotation::new(-1.0, -0.5),
                ZoomState::new(6.0),
            );
            topology
                .features("countries")
                .unwrap()
                .iter()
                .map(|f| ProjectedShape::project(&projection, &f.geometry).to_svg_path())
                .collect::<Vec<_>>()
        };

        let first = render();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|d| d.starts_with('M') && d.ends_with('Z')));
        assert_ne!(first[0], first[1]);
        assert_eq!(first, render());
    }
}
