//! Top bar UI: app title, load status, and view controls.

use crate::state::{AppState, LoadStatus};
use crate::ui::colors;
use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;

/// Requests the top bar hands back to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    ExportSvg,
}

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) -> Option<TopBarAction> {
    let mut action = None;

    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new(format!("{} Compass Globe", icons::COMPASS))
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                let status_color = match state.load_status {
                    LoadStatus::Failed(_) => colors::ui::ERROR,
                    _ => Color32::GRAY,
                };
                ui.label(
                    RichText::new(state.status_message())
                        .size(13.0)
                        .color(status_color),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(format!("{} Export SVG", icons::EXPORT))
                        .on_hover_text("Save the current view as SVG")
                        .clicked()
                    {
                        action = Some(TopBarAction::ExportSvg);
                    }

                    if ui
                        .button(format!("{} Reset", icons::ARROW_COUNTER_CLOCKWISE))
                        .on_hover_text("Recenter and reset zoom (or double-click the globe)")
                        .clicked()
                    {
                        state.reset_view();
                    }

                    let mut labels = state.layer_state.labels;
                    if ui.checkbox(&mut labels, "Labels").changed() {
                        state.set_labels(labels);
                    }
                });
            });
        });

    action
}
