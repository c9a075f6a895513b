//! Application state management.
//!
//! View state (rotation, zoom) is owned by the app instance and handed to
//! gesture handlers by `&mut`; nothing here is process-global.

mod layer;
mod settings;
pub mod url_state;
mod view;

use url_state::UrlParams;

pub use layer::LayerState;
pub use settings::MapSettings;
pub use view::{Rotation, ViewGeometry, ZoomState};

use crate::geo::AzimuthalEquidistant;
use geo_types::Coord;

/// Progress of the one-shot topology load.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Loading,
    Loaded {
        countries: usize,
    },
    Failed(String),
}

/// Root application state containing all sub-states.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Fixed drawing dimensions
    pub view: ViewGeometry,

    /// Globe rotation, mutated only by the interaction controller
    pub rotation: Rotation,

    /// Zoom scale, mutated only by the interaction controller
    pub zoom: ZoomState,

    /// Layer visibility toggles
    pub layer_state: LayerState,

    /// Topology load progress
    pub load_status: LoadStatus,

    /// Geographic position under the pointer while it hovers the globe
    pub pointer: Option<Coord<f64>>,

    /// Effective settings: stored settings plus URL overrides
    pub settings: MapSettings,

    /// Settings as persisted, without URL overrides
    stored_settings: MapSettings,
}

impl AppState {
    pub fn new(stored: MapSettings, overrides: &UrlParams) -> Self {
        let settings = stored.with_url_params(overrides);
        let mut state = Self {
            layer_state: LayerState {
                labels: settings.show_labels,
            },
            settings,
            stored_settings: stored,
            ..Default::default()
        };
        state.reset_view();
        state
    }

    /// Shows or hides country labels and persists the choice. Only the
    /// labels flag is written; URL overrides stay out of storage.
    pub fn set_labels(&mut self, visible: bool) {
        self.layer_state.labels = visible;
        self.settings.show_labels = visible;
        self.stored_settings.show_labels = visible;
        self.stored_settings.save();
    }

    /// Restores the configured center and unit zoom.
    pub fn reset_view(&mut self) {
        self.rotation = Rotation::new(-self.settings.center_lon, -self.settings.center_lat);
        self.zoom = ZoomState::default();
    }

    /// Projection for the current rotation and zoom.
    pub fn projection(&self) -> AzimuthalEquidistant {
        AzimuthalEquidistant::for_view(&self.view, self.rotation, self.zoom)
    }

    /// Status line shown in the top bar.
    pub fn status_message(&self) -> String {
        match &self.load_status {
            LoadStatus::Loading => "Loading boundaries…".to_string(),
            LoadStatus::Loaded { countries } => format!("{} countries", countries),
            LoadStatus::Failed(e) => format!("Boundaries unavailable: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_centers_on_configured_point() {
        let settings = MapSettings {
            center_lat: 40.0,
            center_lon: -100.0,
            show_labels: true,
            ..Default::default()
        };
        let mut state = AppState::new(settings, &UrlParams::default());

        assert_eq!(state.rotation, Rotation::new(100.0, -40.0));
        assert!(state.layer_state.labels);

        state.rotation.rotate_by(30.0, 10.0);
        state.zoom.set_scale(3.0);
        state.reset_view();
        assert_eq!(state.rotation, Rotation::new(100.0, -40.0));
        assert_eq!(state.zoom.scale(), 1.0);
    }

    #[test]
    fn test_label_toggle_does_not_persist_url_overrides() {
        let overrides = url_state::parse_query("?lat=10&lon=20&topology=https%3A%2F%2Fexample.com%2Fw.json");
        let mut state = AppState::new(MapSettings::default(), &overrides);
        assert_eq!(state.settings.center_lat, 10.0);
        assert_eq!(state.rotation, Rotation::new(-20.0, -10.0));

        state.set_labels(true);
        assert!(state.layer_state.labels);
        assert!(state.settings.show_labels);

        let persisted = serde_json::to_string(&state.stored_settings).unwrap();
        assert!(persisted.contains("\"show_labels\":true"));
        assert!(!persisted.contains("example.com"));
        assert_eq!(state.stored_settings.center_lat, 0.0);
        assert_eq!(state.stored_settings.center_lon, 0.0);
    }

    #[test]
    fn test_status_message() {
        let mut state = AppState::default();
        assert_eq!(state.status_message(), "Loading boundaries…");
        state.load_status = LoadStatus::Loaded { countries: 177 };
        assert_eq!(state.status_message(), "177 countries");
    }
}
