//! Coordinate readout: rotation and pointer position as text.

use crate::state::{AppState, Rotation};
use crate::ui::colors;
use eframe::egui::{self, Rect, RichText, Vec2};
use geo_types::Coord;

/// Formats a latitude/longitude pair with hemisphere letters,
/// e.g. `40.00°N 100.00°W`.
pub fn format_lat_lon(lat: f64, lon: f64) -> String {
    format!(
        "{} {}",
        with_hemisphere(lat, 'N', 'S'),
        with_hemisphere(lon, 'E', 'W')
    )
}

/// Two-decimal magnitude plus hemisphere letter. The letter follows the
/// printed value, so anything that rounds to zero reads as positive.
fn with_hemisphere(value: f64, positive: char, negative: char) -> String {
    let magnitude = format!("{:.2}", value.abs());
    let is_zero = magnitude.bytes().all(|b| b == b'0' || b == b'.');
    let letter = if value < 0.0 && !is_zero { negative } else { positive };
    format!("{}°{}", magnitude, letter)
}

/// The point the view is centered on: (-yaw, -pitch).
pub fn format_rotation(rotation: &Rotation) -> String {
    format_lat_lon(-rotation.pitch, wrap_longitude(-rotation.yaw))
}

/// Formats a geographic `x = lon, y = lat` coordinate.
pub fn format_pointer(lon_lat: Coord<f64>) -> String {
    format_lat_lon(lon_lat.y, wrap_longitude(lon_lat.x))
}

/// Wraps a longitude into [-180, 180).
fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Draws the readout in the top-left corner of the canvas.
pub fn draw_readout(ui: &mut egui::Ui, rect: &Rect, state: &AppState) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(220.0, 50.0));

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(
                RichText::new(format!("Center  {}", format_rotation(&state.rotation)))
                    .monospace()
                    .size(12.0)
                    .color(colors::ui::VALUE),
            );
            if let Some(pointer) = state.pointer {
                ui.label(
                    RichText::new(format!("Cursor  {}", format_pointer(pointer)))
                        .monospace()
                        .size(12.0)
                        .color(colors::ui::LABEL),
                );
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rotation() {
        assert_eq!(format_rotation(&Rotation::new(100.0, -40.0)), "40.00°N 100.00°W");
        assert_eq!(format_rotation(&Rotation::new(-12.346, 33.333)), "33.33°S 12.35°E");
    }

    #[test]
    fn test_format_wraps_longitude() {
        assert_eq!(format_rotation(&Rotation::new(-370.0, 0.0)), "0.00°N 10.00°E");
        assert_eq!(format_pointer(Coord { x: 190.0, y: 5.0 }), "5.00°N 170.00°W");
    }

    #[test]
    fn test_values_rounding_to_zero_are_positive() {
        assert_eq!(format_lat_lon(-0.004, -0.001), "0.00°N 0.00°E");
        assert_eq!(format_lat_lon(-0.0, 0.0), "0.00°N 0.00°E");
        assert_eq!(format_lat_lon(-0.006, -0.006), "0.01°S 0.01°W");
        assert_eq!(format_rotation(&Rotation::new(0.003, 0.004)), "0.00°N 0.00°E");
    }

    #[test]
    fn test_format_huge_yaw() {
        let text = format_rotation(&Rotation::new(1.0e15, 0.0));
        assert!(text.ends_with('E') || text.ends_with('W'));
    }
}
