//! Geographic layer system for the globe.
//!
//! This module provides topology decoding, the azimuthal equidistant
//! projection, projected country shapes and their rendering.

mod compass;
mod layer;
mod path;
mod projection;
mod renderer;
mod svg;
pub(crate) mod topology;

pub use compass::{compass_ticks, CompassTick};
pub use layer::{CountryFeature, CountryLayer, ReconcileStats};
pub use path::ProjectedShape;
pub use projection::{AzimuthalEquidistant, ProjectionEngine};
pub use renderer::{
    build_ticks, render_clip_mask, render_countries, render_labels, render_ticks, render_water,
    ScreenMapping,
};
pub use svg::render_svg;
pub use topology::{Topology, TopologyError};
