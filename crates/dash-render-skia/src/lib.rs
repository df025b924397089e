// File: crates/dash-render-skia/src/lib.rs
// Summary: Renderer crate entry point; PNG via Skia CPU raster surfaces and SVG markup for chart specs.

pub mod types;
pub mod geometry;
pub mod grid;
pub mod scale;
pub mod theme;
pub mod view;
pub mod downsample;
pub mod text;
pub mod error;
pub mod png;
pub mod svg;
mod layout;

pub use types::{Insets, RenderOptions};
pub use theme::Theme;
pub use view::ViewState;
pub use error::RenderError;
pub use png::{render_png, render_png_bytes};
pub use svg::render_svg;
