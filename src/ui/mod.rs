//! UI modules for the Compass Globe application.
//!
//! The UI is split into two regions:
//! - Top bar: title, load status, labels toggle, reset and export
//! - Central canvas: the globe, compass ring and coordinate readout

mod canvas;
pub mod colors;
mod readout;
mod top_bar;

pub use canvas::{render_canvas, GlobeScene};
pub use top_bar::{render_top_bar, TopBarAction};
