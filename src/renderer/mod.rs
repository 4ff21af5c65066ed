//! Rendering module
//!
//! Scene drawing is written against the `Surface` trait; backends are the
//! browser canvas, SVG for headless snapshots, and a recorder for tests.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;
pub mod surface;
pub mod svg;

pub use scene::render;
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use svg::SvgSurface;
