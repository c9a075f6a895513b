//! Central canvas UI: the globe render group and its gestures.

use crate::geo::{self, CompassTick, CountryFeature, CountryLayer, ReconcileStats, ScreenMapping};
use crate::interaction::{InteractionController, WHEEL_SENSITIVITY};
use crate::state::{AppState, Rotation, ZoomState};
use crate::ui::{colors, readout};
use eframe::egui::{self, Sense};
use geo_types::Coord;

/// Everything the canvas draws, plus the gesture state machine.
pub struct GlobeScene {
    pub countries: CountryLayer,
    /// Compass ring, built once for the fixed view geometry.
    pub ticks: Vec<CompassTick>,
    controller: InteractionController,
    /// Pinch ratio accumulated since the gesture began.
    pinch_ratio: f64,
    /// View the shapes were last projected for.
    projected_for: Option<(Rotation, ZoomState)>,
}

impl GlobeScene {
    pub fn new(state: &AppState) -> Self {
        Self {
            countries: CountryLayer::new(),
            ticks: geo::build_ticks(&state.view),
            controller: InteractionController::new(),
            pinch_ratio: 1.0,
            projected_for: None,
        }
    }

    pub fn set_features(&mut self, features: Vec<CountryFeature>) -> ReconcileStats {
        self.projected_for = None;
        self.countries.reconcile(features)
    }

    /// Re-projects every country shape and label if the view changed.
    /// Returns true when a projection pass ran.
    pub fn refresh(&mut self, state: &AppState) -> bool {
        let current = (state.rotation, state.zoom);
        if self.projected_for == Some(current) {
            return false;
        }
        self.countries.reproject(&state.projection());
        self.projected_for = Some(current);
        true
    }
}

/// Renders the globe canvas and applies this frame's gestures.
pub fn render_canvas(ctx: &egui::Context, state: &mut AppState, scene: &mut GlobeScene) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(colors::canvas::BACKGROUND))
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
            let rect = response.rect;
            if handle_canvas_interaction(&response, state, scene) {
                ctx.request_repaint();
            }

            // The whole render group (disk, clip, ticks, labels) scales
            // with the zoom on top of the projection radius.
            let mapping = ScreenMapping::fit(&state.view, rect)
                .zoomed(&state.view, state.zoom.scale());
            update_pointer(&response, &mapping, state);
            scene.refresh(state);

            geo::render_water(&painter, &state.view, &mapping);
            geo::render_countries(&painter, &scene.countries, &mapping);
            if state.layer_state.labels {
                geo::render_labels(&painter, &scene.countries, &state.view, &mapping);
            }
            geo::render_clip_mask(&painter, &state.view, &mapping, rect);
            geo::render_ticks(&painter, &scene.ticks, &mapping);

            readout::draw_readout(ui, &rect, state);
        });
}

/// Feeds drag, pinch and wheel input to the controller. Returns true when
/// the rotation or zoom changed.
fn handle_canvas_interaction(
    response: &egui::Response,
    state: &mut AppState,
    scene: &mut GlobeScene,
) -> bool {
    let mut changed = false;
    let controller = &mut scene.controller;

    // Two or more fingers: pinch zoom.
    let multi_touch = response.ctx.input(|i| i.multi_touch());
    match &multi_touch {
        Some(touch) if touch.num_touches >= 2 => {
            if !controller.is_pinching() {
                controller.pinch_start(&state.zoom);
                scene.pinch_ratio = 1.0;
                controller.pan_end();
            }
            scene.pinch_ratio *= touch.zoom_delta as f64;
            changed |= controller.pinch_move(scene.pinch_ratio, &mut state.zoom);
        }
        _ => {
            if controller.is_pinching() {
                controller.pinch_end();
            }
        }
    }

    // Mouse drag or one-finger pan: rotation.
    if !controller.is_pinching() {
        if response.drag_started() {
            controller.pan_start();
        }
        if response.dragged() {
            let total = response.ctx.input(|i| {
                match (i.pointer.press_origin(), i.pointer.interact_pos()) {
                    (Some(origin), Some(pos)) => Some(pos - origin),
                    _ => None,
                }
            });
            if let Some(total) = total {
                let total = Coord {
                    x: total.x as f64,
                    y: total.y as f64,
                };
                changed |= drag_tick(controller, total, state);
            }
        }
    }
    if response.drag_stopped() {
        controller.pan_end();
    }

    // Wheel, plus ctrl+wheel and trackpad pinch which egui reports as zoom.
    if response.hovered() && multi_touch.is_none() {
        let (scroll, zoom_delta) = response.ctx.input(|i| (i.raw_scroll_delta.y, i.zoom_delta()));
        if scroll != 0.0 {
            changed |= controller.wheel(-scroll as f64, &mut state.zoom);
        }
        if zoom_delta != 1.0 {
            let equivalent = -(zoom_delta as f64).log2() / WHEEL_SENSITIVITY;
            changed |= controller.wheel(equivalent, &mut state.zoom);
        }
    }

    if response.double_clicked() {
        state.reset_view();
        changed = true;
    }

    changed
}

/// Applies one drag tick. A drag that outlives a pinch has no pan baseline;
/// it resumes from the current translation instead of the press origin.
fn drag_tick(controller: &mut InteractionController, total: Coord<f64>, state: &mut AppState) -> bool {
    if !controller.is_panning() {
        controller.pan_start_at(total);
    }
    controller.pan_move(total, &mut state.rotation, &state.zoom)
}

/// Tracks the geographic position under the pointer for the readout.
fn update_pointer(response: &egui::Response, mapping: &ScreenMapping, state: &mut AppState) {
    use crate::geo::ProjectionEngine;

    state.pointer = response
        .hover_pos()
        .map(|pos| mapping.to_view(pos))
        .filter(|p| state.view.contains(*p))
        .and_then(|p| state.projection().invert(p));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::topology::tests::two_country_fixture;

    fn paths(scene: &GlobeScene) -> Vec<String> {
        scene.countries.iter().map(|c| c.shape.to_svg_path()).collect()
    }

    #[test]
    fn test_scene_reprojects_only_when_view_changes() {
        let mut state = AppState::default();
        let mut scene = GlobeScene::new(&state);
        assert_eq!(scene.ticks.len(), 72);

        let features = crate::data::decode(&two_country_fixture(), "countries").unwrap();
        scene.set_features(features);
        assert!(scene.refresh(&state));
        assert!(!scene.refresh(&state));
        let first = paths(&scene);

        state.rotation = Rotation::new(25.0, 10.0);
        assert!(scene.refresh(&state));
        assert_ne!(first, paths(&scene));

        state.reset_view();
        assert!(scene.refresh(&state));
        assert_eq!(first, paths(&scene));
    }

    #[test]
    fn test_drag_resumed_after_pinch_does_not_jump() {
        let mut state = AppState::default();
        let mut controller = InteractionController::new();

        controller.pan_start();
        assert!(drag_tick(&mut controller, Coord { x: 4.0, y: 0.0 }, &mut state));
        assert!((state.rotation.yaw - 1.0).abs() < 1e-12);

        // A pinch interrupts the pan while the pointer keeps moving.
        controller.pinch_start(&state.zoom);
        controller.pan_end();
        controller.pinch_end();

        assert!(!drag_tick(&mut controller, Coord { x: 300.0, y: 0.0 }, &mut state));
        assert!(drag_tick(&mut controller, Coord { x: 301.0, y: 0.0 }, &mut state));
        assert!((state.rotation.yaw - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_new_features_force_reprojection() {
        let state = AppState::default();
        let mut scene = GlobeScene::new(&state);
        assert!(scene.refresh(&state));

        let features = crate::data::decode(&two_country_fixture(), "countries").unwrap();
        scene.set_features(features);
        assert!(scene.refresh(&state));
        assert!(scene.countries.iter().all(|c| !c.shape.is_empty()));
    }
}
