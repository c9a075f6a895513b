//! Globe rendering.
//!
//! Paints the render group onto the egui canvas. Projection works in view
//! space (see [`ViewGeometry`]); [`ScreenMapping`] scales it onto the
//! allocated rectangle and carries the group's zoom transform.

use super::{compass_ticks, CompassTick, CountryLayer, ProjectedShape};
use crate::state::ViewGeometry;
use crate::ui::colors;
use eframe::egui::{self, Align2, Color32, FontId, Mesh, Painter, Pos2, Rect, Shape, Stroke};
use geo_types::Coord;

/// Maps view-space coordinates onto a screen rectangle of the same aspect.
#[derive(Debug, Clone, Copy)]
pub struct ScreenMapping {
    origin: Pos2,
    scale: f32,
}

impl ScreenMapping {
    /// Fits the view into `rect`, keeping the aspect ratio and centering.
    pub fn fit(view: &ViewGeometry, rect: Rect) -> Self {
        let scale = (rect.width() / view.width as f32).min(rect.height() / view.height as f32);
        let size = egui::vec2(view.width as f32 * scale, view.height as f32 * scale);
        let origin = rect.center() - size / 2.0;
        Self { origin, scale }
    }

    /// Applies the render group's zoom: a scale by `k` about the view
    /// center, which stays at the same screen position.
    pub fn zoomed(&self, view: &ViewGeometry, k: f64) -> Self {
        let pivot = self.to_screen(view.center());
        let scale = self.scale * k as f32;
        let origin = Pos2::new(
            pivot.x - view.center().x as f32 * scale,
            pivot.y - view.center().y as f32 * scale,
        );
        Self { origin, scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_screen(&self, c: Coord<f64>) -> Pos2 {
        Pos2::new(
            self.origin.x + c.x as f32 * self.scale,
            self.origin.y + c.y as f32 * self.scale,
        )
    }

    pub fn to_view(&self, pos: Pos2) -> Coord<f64> {
        Coord {
            x: ((pos.x - self.origin.x) / self.scale) as f64,
            y: ((pos.y - self.origin.y) / self.scale) as f64,
        }
    }
}

/// Draws the water disk behind the countries.
pub fn render_water(painter: &Painter, view: &ViewGeometry, mapping: &ScreenMapping) {
    painter.circle_filled(
        mapping.to_screen(view.center()),
        view.clip_radius() as f32 * mapping.scale(),
        colors::globe::WATER,
    );
}

/// Draws every country shape: triangulated fill plus outline.
pub fn render_countries(painter: &Painter, layer: &CountryLayer, mapping: &ScreenMapping) {
    let stroke = Stroke::new(0.6, colors::globe::BORDER);
    for country in layer.iter() {
        render_shape(painter, &country.shape, mapping, colors::globe::LAND, stroke);
    }
}

fn render_shape(
    painter: &Painter,
    shape: &ProjectedShape,
    mapping: &ScreenMapping,
    fill: Color32,
    stroke: Stroke,
) {
    for rings in &shape.polygons {
        if let Some(mesh) = triangulate(rings, mapping, fill) {
            painter.add(Shape::mesh(mesh));
        }
        for ring in rings {
            let points: Vec<Pos2> = ring.iter().map(|c| mapping.to_screen(*c)).collect();
            painter.add(Shape::closed_line(points, stroke));
        }
    }
}

/// Triangulates one polygon (exterior followed by holes) into a mesh.
fn triangulate(rings: &[Vec<Coord<f64>>], mapping: &ScreenMapping, fill: Color32) -> Option<Mesh> {
    let mut coords: Vec<f64> = Vec::new();
    let mut holes: Vec<usize> = Vec::new();

    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            holes.push(coords.len() / 2);
        }
        for c in ring {
            coords.push(c.x);
            coords.push(c.y);
        }
    }

    let indices = earcutr::earcut(&coords, &holes, 2).ok()?;
    if indices.is_empty() {
        return None;
    }

    let mut mesh = Mesh::default();
    for pair in coords.chunks_exact(2) {
        mesh.colored_vertex(mapping.to_screen(Coord { x: pair[0], y: pair[1] }), fill);
    }
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
    }
    Some(mesh)
}

/// Masks everything outside the clip disk with the canvas background.
pub fn render_clip_mask(
    painter: &Painter,
    view: &ViewGeometry,
    mapping: &ScreenMapping,
    rect: Rect,
) {
    let radius = view.clip_radius() as f32 * mapping.scale();
    let width = rect.width().max(rect.height()) * 2.0;
    painter.circle_stroke(
        mapping.to_screen(view.center()),
        radius + width / 2.0,
        Stroke::new(width, colors::canvas::BACKGROUND),
    );
    painter.circle_stroke(
        mapping.to_screen(view.center()),
        radius,
        Stroke::new(1.0, colors::globe::RIM),
    );
}

/// Builds the tick ring once for a view.
pub fn build_ticks(view: &ViewGeometry) -> Vec<CompassTick> {
    compass_ticks(view.center(), view.clip_radius())
}

/// Draws the compass ring.
pub fn render_ticks(painter: &Painter, ticks: &[CompassTick], mapping: &ScreenMapping) {
    let stroke = Stroke::new(1.0, colors::globe::TICK);
    let font = FontId::proportional((11.0 * mapping.scale()).max(7.0));

    for tick in ticks {
        painter.line_segment(
            [mapping.to_screen(tick.outer), mapping.to_screen(tick.inner)],
            stroke,
        );
        if let Some((text, at)) = &tick.label {
            painter.text(
                mapping.to_screen(*at),
                Align2::CENTER_CENTER,
                text,
                font.clone(),
                colors::globe::TICK,
            );
        }
    }
}

/// Draws country names at their centroids, inside the disk only.
pub fn render_labels(
    painter: &Painter,
    layer: &CountryLayer,
    view: &ViewGeometry,
    mapping: &ScreenMapping,
) {
    let font = FontId::proportional((10.0 * mapping.scale()).max(7.0));
    for country in layer.iter().filter(|c| !c.feature.name.is_empty()) {
        if let Some(c) = country.centroid.filter(|c| view.contains(*c)) {
            painter.text(
                mapping.to_screen(c),
                Align2::CENTER_CENTER,
                &country.feature.name,
                font.clone(),
                colors::globe::LABEL,
            );
        }
    }
}
