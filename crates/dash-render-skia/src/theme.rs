// File: crates/dash-render-skia/src/theme.rs
// Summary: Light/Dark theming for chart backgrounds, grid, axes and text.
// Notes:
// - Colors are backend-neutral `Rgba` so the PNG and SVG renderers share one theme.

use dash_core::Rgba;
use skia_safe as skia;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgba,
    pub plot_background: Rgba,
    pub grid: Rgba,
    pub axis_line: Rgba,
    pub axis_label: Rgba,
    pub tick: Rgba,
    pub title: Rgba,
}

impl Theme {
    /// White page and light grey grid; the dashboard default.
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Rgba::rgb(255, 255, 255),
            plot_background: Rgba::rgb(255, 255, 255),
            grid: Rgba::rgb(235, 240, 248),
            axis_line: Rgba::rgb(60, 60, 70),
            axis_label: Rgba::rgb(42, 63, 95),
            tick: Rgba::rgb(100, 100, 110),
            title: Rgba::rgb(20, 20, 30),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Rgba::rgb(18, 18, 20),
            plot_background: Rgba::rgb(24, 24, 28),
            grid: Rgba::rgb(40, 40, 45),
            axis_line: Rgba::rgb(180, 180, 190),
            axis_label: Rgba::rgb(235, 235, 245),
            tick: Rgba::rgb(150, 150, 160),
            title: Rgba::rgb(245, 245, 250),
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light",
            background: Rgba::rgb(0xfd, 0xf6, 0xe3), // base3
            plot_background: Rgba::rgb(0xfd, 0xf6, 0xe3),
            grid: Rgba::rgb(0xee, 0xe8, 0xd5),       // base2
            axis_line: Rgba::rgb(0x65, 0x7b, 0x83),  // base00
            axis_label: Rgba::rgb(0x00, 0x2b, 0x36), // base03
            tick: Rgba::rgb(0x58, 0x6e, 0x75),       // base01
            title: Rgba::rgb(0x00, 0x2b, 0x36),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

/// Built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::solarized_light()]
}

/// Find a theme by its `name`, case-insensitively.
pub fn find(name: &str) -> Option<Theme> {
    presets().into_iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}

pub(crate) fn to_skia(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}
