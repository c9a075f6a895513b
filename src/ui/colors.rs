//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across the canvas and panels.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for readout labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for readout values.
    pub const VALUE: Color32 = Color32::from_rgb(200, 200, 220);
    /// Error status text.
    pub const ERROR: Color32 = Color32::from_rgb(255, 110, 110);
}

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Background color outside the globe.
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 35);
}

/// Colors for the globe render group.
pub mod globe {
    use super::Color32;

    /// Water disk.
    pub const WATER: Color32 = Color32::from_rgb(27, 58, 92);
    /// Country fill.
    pub const LAND: Color32 = Color32::from_rgb(95, 127, 90);
    /// Country outline.
    pub const BORDER: Color32 = Color32::from_rgb(42, 58, 42);
    /// Rim of the clip disk.
    pub const RIM: Color32 = Color32::from_rgb(80, 100, 130);
    /// Compass ticks and degree labels.
    pub const TICK: Color32 = Color32::from_rgb(154, 164, 184);
    /// Country name labels.
    pub const LABEL: Color32 = Color32::from_rgb(232, 232, 240);
}
