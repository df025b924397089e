// File: crates/dash-render-skia/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math.

use crate::types::RenderOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectI32 {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RectI32 {
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }
    pub const fn width(&self) -> i32 { self.right - self.left }
    pub const fn height(&self) -> i32 { self.bottom - self.top }

    /// Plot area left over after the insets; never narrower than one pixel.
    pub fn plot_area(opts: &RenderOptions) -> Self {
        let left = opts.insets.left as i32;
        let top = opts.insets.top as i32;
        let right = (opts.width - opts.insets.right as i32).max(left + 1);
        let bottom = (opts.height - opts.insets.bottom as i32).max(top + 1);
        Self::from_ltrb(left, top, right, bottom)
    }
}
