//! Standalone SVG rendering of the map.
//!
//! Produces the same render group as the canvas: clip circle, water disk,
//! one path per country, the compass ring and optional labels. The group
//! carries the zoom as a scale about the view center.

use super::{compass_ticks, CountryLayer};
use crate::state::AppState;
use crate::ui::colors::globe;
use eframe::egui::Color32;
use std::fmt::Write as _;

/// `#rrggbb` for an opaque palette color.
fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Renders the current view to an SVG document.
pub fn render_svg(state: &AppState, layer: &CountryLayer) -> String {
    let view = &state.view;
    let center = view.center();
    let radius = view.clip_radius();
    let mut s = String::with_capacity(64 * 1024);

    let _ = writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" preserveAspectRatio="xMidYMid meet">"#,
        w = view.width,
        h = view.height
    );
    let _ = writeln!(
        s,
        r#"  <defs><clipPath id="globe-clip"><circle cx="{:.2}" cy="{:.2}" r="{:.2}"/></clipPath></defs>"#,
        center.x, center.y, radius
    );

    let _ = writeln!(
        s,
        r#"  <g transform="translate({cx:.2},{cy:.2}) scale({k:.4}) translate({ncx:.2},{ncy:.2})">"#,
        cx = center.x,
        cy = center.y,
        k = state.zoom.scale(),
        ncx = -center.x,
        ncy = -center.y
    );
    s.push_str("  <g clip-path=\"url(#globe-clip)\">\n");
    let _ = writeln!(
        s,
        r#"    <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
        center.x,
        center.y,
        radius,
        hex(globe::WATER)
    );
    let _ = writeln!(
        s,
        r#"    <g fill="{}" stroke="{}" stroke-width="0.5">"#,
        hex(globe::LAND),
        hex(globe::BORDER)
    );
    for country in layer.iter().filter(|c| !c.shape.is_empty()) {
        let _ = writeln!(
            s,
            r#"      <path data-id="{}" d="{}"/>"#,
            escape(&country.feature.id),
            country.shape.to_svg_path()
        );
    }
    s.push_str("    </g>\n");

    if state.layer_state.labels {
        s.push_str("    <g font-family=\"sans-serif\" font-size=\"10\" text-anchor=\"middle\" fill=\"");
        s.push_str(&hex(globe::LABEL));
        s.push_str("\">\n");
        for country in layer.iter().filter(|c| !c.feature.name.is_empty()) {
            if let Some(c) = country.centroid.filter(|c| view.contains(*c)) {
                let _ = writeln!(
                    s,
                    r#"      <text x="{:.2}" y="{:.2}">{}</text>"#,
                    c.x,
                    c.y,
                    escape(&country.feature.name)
                );
            }
        }
        s.push_str("    </g>\n");
    }
    s.push_str("  </g>\n");

    let _ = writeln!(
        s,
        r#"  <g stroke="{t}" fill="{t}" font-family="sans-serif" font-size="11" text-anchor="middle">"#,
        t = hex(globe::TICK)
    );
    for tick in compass_ticks(center, radius) {
        let _ = writeln!(
            s,
            r#"    <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"/>"#,
            tick.outer.x, tick.outer.y, tick.inner.x, tick.inner.y
        );
        if let Some((text, at)) = tick.label {
            let _ = writeln!(
                s,
                r#"    <text x="{:.2}" y="{:.2}" stroke="none" dominant-baseline="middle">{}</text>"#,
                at.x, at.y, text
            );
        }
    }
    s.push_str("  </g>\n");
    s.push_str("  </g>\n");
    s.push_str("</svg>\n");
    s
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
