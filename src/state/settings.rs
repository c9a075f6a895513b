//! Map settings.
//!
//! Settings are persisted to localStorage so they survive page reloads.
//! URL query parameters override them for the current page only; they are
//! never written back.

use serde::{Deserialize, Serialize};

/// Public CDN copy of the Natural Earth 1:110m countries topology.
pub const DEFAULT_TOPOLOGY_URL: &str =
    "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// User-facing configuration for the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Where the boundary topology is fetched from.
    pub topology_url: String,
    /// Name of the topology object holding country geometries.
    pub object_name: String,
    /// Draw country names at shape centroids.
    pub show_labels: bool,
    /// Latitude the view is centered on at mount and on reset.
    pub center_lat: f64,
    /// Longitude the view is centered on at mount and on reset.
    pub center_lon: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            topology_url: DEFAULT_TOPOLOGY_URL.to_string(),
            object_name: "countries".to_string(),
            show_labels: false,
            center_lat: 0.0,
            center_lon: 0.0,
        }
    }
}

impl MapSettings {
    /// localStorage key for persisting settings.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "compass_globe_settings";

    /// Loads the persisted settings, without URL overrides.
    pub fn load() -> Self {
        Self::load_persisted()
    }

    /// Copy of these settings with URL query overrides applied.
    pub fn with_url_params(&self, params: &super::url_state::UrlParams) -> Self {
        let mut settings = self.clone();
        settings.apply_url_params(params);
        settings
    }

    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Applies URL query overrides.
    pub fn apply_url_params(&mut self, params: &super::url_state::UrlParams) {
        if let Some(labels) = params.labels {
            self.show_labels = labels;
        }
        if let Some(lat) = params.lat {
            self.center_lat = lat.clamp(-90.0, 90.0);
        }
        if let Some(lon) = params.lon {
            self.center_lon = lon;
        }
        if let Some(url) = &params.topology {
            self.topology_url = url.clone();
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn load_persisted() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded map settings from localStorage");
                settings
            }
            Err(e) => {
                log::warn!("Failed to parse map settings: {}", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_persisted() -> Self {
        Self::default()
    }

    /// Saves settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize map settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save map settings: {:?}", e);
        } else {
            log::debug!("Saved map settings to localStorage");
        }
    }

    /// No-op for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
