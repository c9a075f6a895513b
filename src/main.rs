#![warn(clippy::all)]

//! Compass Globe - an interactive azimuthal equidistant world map.
//!
//! Country boundaries are fetched once as TopoJSON and drawn inside a
//! circular clip with a compass tick ring around the rim. Dragging rotates
//! the globe; pinch and wheel zoom it.

mod data;
mod geo;
mod interaction;
mod state;
mod ui;

use data::{LoadResult, TopologyChannel};
use eframe::egui;
use state::url_state::{self, UrlParams};
use state::{AppState, LoadStatus, MapSettings};
use ui::{GlobeScene, TopBarAction};

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 960.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Compass Globe",
        native_options,
        Box::new(|cc| Ok(Box::new(GlobeApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to mount into");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("app_canvas")
            .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("app_canvas missing or not a canvas element");
            return;
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(GlobeApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct GlobeApp {
    /// View, layer and load state
    state: AppState,
    /// Projected countries, compass ring and gesture controller
    scene: GlobeScene,
    /// One-shot boundary fetch; dropping it discards a late response
    topology_channel: TopologyChannel,
}

impl GlobeApp {
    /// Creates the app and starts the boundary fetch.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let app = Self::with_settings(MapSettings::load(), &url_state::parse_from_url());
        app.start_load(&cc.egui_ctx);
        app
    }

    /// Kicks off the one-shot boundary fetch for the configured dataset.
    fn start_load(&self, ctx: &egui::Context) {
        self.topology_channel.load(
            ctx.clone(),
            self.state.settings.topology_url.clone(),
            self.state.settings.object_name.clone(),
        );
    }

    /// Applies the load result if it has arrived. Returns true when one did.
    fn poll_topology(&mut self) -> bool {
        match self.topology_channel.try_recv() {
            Some(result) => {
                self.apply_load_result(result);
                true
            }
            None => false,
        }
    }

    fn with_settings(stored: MapSettings, overrides: &UrlParams) -> Self {
        let state = AppState::new(stored, overrides);
        let scene = GlobeScene::new(&state);
        Self {
            state,
            scene,
            topology_channel: TopologyChannel::new(),
        }
    }

    /// Applies a finished load. A failure is logged once and leaves the
    /// scaffold (water disk, ticks, readout) on screen.
    fn apply_load_result(&mut self, result: LoadResult) {
        match result {
            Ok(features) => {
                let stats = self.scene.set_features(features);
                if self.scene.countries.is_empty() {
                    log::warn!("Topology contained no drawable countries");
                }
                log::info!(
                    "Countries reconciled: {} entered, {} updated, {} exited",
                    stats.entered,
                    stats.updated,
                    stats.exited
                );
                self.state.load_status = LoadStatus::Loaded {
                    countries: self.scene.countries.len(),
                };
            }
            Err(e) => {
                log::error!("Failed to load country boundaries: {}", e);
                self.state.load_status = LoadStatus::Failed(e.to_string());
            }
        }
    }

    fn export_svg(&mut self, ctx: &egui::Context) {
        self.scene.refresh(&self.state);
        let svg = geo::render_svg(&self.state, &self.scene.countries);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = ctx;
            let path = std::path::Path::new("compass-globe.svg");
            match std::fs::write(path, &svg) {
                Ok(()) => log::info!("Exported {} bytes to {}", svg.len(), path.display()),
                Err(e) => log::warn!("Failed to write {}: {}", path.display(), e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            log::info!("Copied {} bytes of SVG to the clipboard", svg.len());
            ctx.copy_text(svg);
        }
    }
}

impl eframe::App for GlobeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_topology();

        // Top/bottom panels must be rendered before CentralPanel
        if let Some(TopBarAction::ExportSvg) = ui::render_top_bar(ctx, &mut self.state) {
            self.export_svg(ctx);
        }

        ui::render_canvas(ctx, &mut self.state, &mut self.scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::topology::tests::two_country_fixture;
    use log::{Level, Log, Metadata, Record};
    use std::sync::{Mutex, Once};
    use std::thread::{self, ThreadId};
    use std::time::{Duration, Instant};

    /// Level, emitting thread and message of every captured record.
    static RECORDS: Mutex<Vec<(Level, ThreadId, String)>> = Mutex::new(Vec::new());
    static INIT: Once = Once::new();

    struct CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut records) = RECORDS.lock() {
                records.push((
                    record.level(),
                    thread::current().id(),
                    record.args().to_string(),
                ));
            }
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        INIT.call_once(|| {
            log::set_logger(&CaptureLogger).ok();
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    /// Error messages logged from `thread`.
    fn errors_from(thread: ThreadId) -> Vec<String> {
        RECORDS
            .lock()
            .map(|records| {
                records
                    .iter()
                    .filter(|(level, id, _)| *level == Level::Error && *id == thread)
                    .map(|(_, _, msg)| msg.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn poll_until_settled(app: &mut GlobeApp) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while !app.poll_topology() {
            assert!(Instant::now() < deadline, "topology load never completed");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_failed_fetch_logs_exactly_one_error_and_keeps_scaffold() {
        capture_logs();
        let overrides = UrlParams {
            topology: Some("http://127.0.0.1:1/countries-110m.json".to_string()),
            ..Default::default()
        };
        let mut app = GlobeApp::with_settings(MapSettings::default(), &overrides);

        app.start_load(&egui::Context::default());
        poll_until_settled(&mut app);
        // Further frames see nothing new.
        assert!(!app.poll_topology());

        let errors = errors_from(thread::current().id());
        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert!(errors[0].contains("127.0.0.1:1"));
        assert!(matches!(app.state.load_status, LoadStatus::Failed(_)));
        assert!(app.scene.countries.is_empty());

        app.scene.refresh(&app.state);
        let svg = geo::render_svg(&app.state, &app.scene.countries);
        assert_eq!(svg.matches("<line").count(), 72);
        assert_eq!(svg.matches("<path").count(), 0);
    }

    #[test]
    fn test_successful_load_populates_layer() {
        let mut app = GlobeApp::with_settings(MapSettings::default(), &UrlParams::default());
        let result = data::decode(&two_country_fixture(), "countries");

        app.apply_load_result(result);

        assert_eq!(app.state.load_status, LoadStatus::Loaded { countries: 2 });
        app.scene.refresh(&app.state);
        let svg = geo::render_svg(&app.state, &app.scene.countries);
        assert_eq!(svg.matches("<path").count(), 2);
    }
}
