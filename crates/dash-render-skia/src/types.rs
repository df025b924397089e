// File: crates/dash-render-skia/src/types.rs
// Summary: Shared render types and constants (surface size, paddings, options).

use crate::theme::Theme;

/// Default surface width in pixels.
pub const WIDTH: i32 = 1024;
/// Default surface height in pixels; matches the default chart height.
pub const HEIGHT: i32 = 600;
/// Line traces with more finite points than this are downsampled before drawing.
pub const MAX_POINTS: usize = 2_000;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    /// Room for the title and legend row on top and a volume axis on the right.
    fn default() -> Self {
        Self::new(80, 80, 72, 56)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    pub theme: Theme,
    /// Text drawing can be turned off for pixel-stable tests.
    pub draw_labels: bool,
    pub max_points: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            theme: Theme::light(),
            draw_labels: true,
            max_points: MAX_POINTS,
        }
    }
}

impl RenderOptions {
    /// Defaults sized to the chart's requested height.
    pub fn for_spec(spec: &dash_core::ChartSpec) -> Self {
        Self { height: spec.height as i32, ..Self::default() }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}
