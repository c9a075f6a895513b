//! Compass-degree tick ring around the circular viewport.

use geo_types::Coord;

/// Degrees between ticks.
const TICK_STEP: u32 = 5;
/// Degrees between labels.
const LABEL_STEP: u32 = 10;
/// Gap between the rim and the label anchor.
const LABEL_OFFSET: f64 = 14.0;

/// One radial tick mark in view space.
#[derive(Debug, Clone, PartialEq)]
pub struct CompassTick {
    /// Compass bearing, 0 = north, increasing clockwise.
    pub degrees: u32,
    /// Point on the rim.
    pub outer: Coord<f64>,
    /// Inner end of the tick line.
    pub inner: Coord<f64>,
    /// Label text and anchor, every [`LABEL_STEP`] degrees.
    pub label: Option<(String, Coord<f64>)>,
}

/// Tick length for a bearing: longer for coarser multiples.
pub fn tick_length(degrees: u32) -> f64 {
    if degrees % 60 == 0 {
        15.0
    } else if degrees % 30 == 0 {
        10.0
    } else if degrees % 10 == 0 {
        7.0
    } else {
        4.0
    }
}

/// Builds the full ring for a disk of `radius` around `center`.
pub fn compass_ticks(center: Coord<f64>, radius: f64) -> Vec<CompassTick> {
    (0..360)
        .step_by(TICK_STEP as usize)
        .map(|degrees| {
            let (sin, cos) = (degrees as f64).to_radians().sin_cos();
            let at = |r: f64| Coord {
                x: center.x + r * sin,
                y: center.y - r * cos,
            };

            CompassTick {
                degrees,
                outer: at(radius),
                inner: at(radius - tick_length(degrees)),
                label: (degrees % LABEL_STEP == 0)
                    .then(|| (format!("{}°", degrees), at(radius + LABEL_OFFSET))),
            }
        })
        .collect()
}
