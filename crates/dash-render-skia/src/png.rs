// File: crates/dash-render-skia/src/png.rs
// Summary: Headless PNG rendering of a chart spec using Skia CPU raster surfaces.

use std::path::Path;

use dash_core::{ChartSpec, Dash, LegendPlacement, TraceKind};
use skia_safe as skia;

use crate::error::RenderError;
use crate::layout::{text_width, Frame, Projected};
use crate::text::TextShaper;
use crate::theme::{to_skia, Theme};
use crate::types::RenderOptions;

const TITLE_SIZE: f32 = 18.0;
const LABEL_SIZE: f32 = 12.0;

/// Render the chart to PNG bytes.
pub fn render_png_bytes(spec: &ChartSpec, opts: &RenderOptions) -> Result<Vec<u8>, RenderError> {
    let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
        .ok_or(RenderError::Surface { width: opts.width, height: opts.height })?;
    draw(surface.canvas(), spec, opts);

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or(RenderError::Encode)?;
    Ok(data.as_bytes().to_vec())
}

/// Render the chart to a PNG at `path`, creating parent directories.
pub fn render_png(spec: &ChartSpec, opts: &RenderOptions, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let bytes = render_png_bytes(spec, opts)?;
    let io_err = |source| RenderError::Io { path: path.display().to_string(), source };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, bytes).map_err(io_err)
}

fn draw(canvas: &skia::Canvas, spec: &ChartSpec, opts: &RenderOptions) {
    let theme = &opts.theme;
    canvas.clear(to_skia(theme.background));

    let frame = Frame::new(spec, opts);
    let p = frame.plot;
    let plot_rect = skia::Rect::from_ltrb(p.left as f32, p.top as f32, p.right as f32, p.bottom as f32);
    canvas.draw_rect(plot_rect, &fill(to_skia(theme.plot_background)));

    if spec.y_axis.show_grid {
        draw_grid(canvas, &frame, theme);
    }

    // Bars first so lines stay on top of the volume histogram.
    for t in frame.traces.iter().filter(|t| t.trace.kind == TraceKind::Bar) {
        draw_bars(canvas, t);
    }
    canvas.save();
    canvas.clip_rect(plot_rect, None, Some(true));
    for t in frame.traces.iter().filter(|t| t.trace.kind == TraceKind::Line) {
        draw_line(canvas, t);
    }
    canvas.restore();

    draw_axes(canvas, &frame, theme);

    if opts.draw_labels {
        let shaper = TextShaper::new();
        draw_labels(canvas, &shaper, spec, &frame, opts);
    }
}

fn fill(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color);
    paint
}

fn stroke(color: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(color);
    paint
}

fn draw_grid(canvas: &skia::Canvas, frame: &Frame, theme: &Theme) {
    let paint = stroke(to_skia(theme.grid), 1.0);
    let p = frame.plot;
    for t in &frame.x_ticks {
        canvas.draw_line((t.px, p.top as f32), (t.px, p.bottom as f32), &paint);
    }
    for t in &frame.y_ticks {
        canvas.draw_line((p.left as f32, t.px), (p.right as f32, t.px), &paint);
    }
    // Zero line for return charts.
    if frame.y.vmin < 0.0 && frame.y.vmax > 0.0 {
        let y0 = frame.y.to_px(0.0);
        canvas.draw_line((p.left as f32, y0), (p.right as f32, y0), &stroke(to_skia(theme.tick), 1.0));
    }
}

fn draw_axes(canvas: &skia::Canvas, frame: &Frame, theme: &Theme) {
    let axis_paint = stroke(to_skia(theme.axis_line), 1.5);
    let p = frame.plot;
    let (l, t, r, b) = (p.left as f32, p.top as f32, p.right as f32, p.bottom as f32);
    canvas.draw_line((l, b), (r, b), &axis_paint);
    canvas.draw_line((l, t), (l, b), &axis_paint);
    if frame.y2.is_some() {
        canvas.draw_line((r, t), (r, b), &axis_paint);
    }

    let tick_paint = stroke(to_skia(theme.tick), 1.0);
    for tk in &frame.x_ticks {
        canvas.draw_line((tk.px, b), (tk.px, b + 5.0), &tick_paint);
    }
    for tk in &frame.y_ticks {
        canvas.draw_line((l - 5.0, tk.px), (l, tk.px), &tick_paint);
    }
    for tk in &frame.y2_ticks {
        canvas.draw_line((r, tk.px), (r + 5.0, tk.px), &tick_paint);
    }
}

fn draw_line(canvas: &skia::Canvas, t: &Projected) {
    let trace = t.trace;
    let mut paint = stroke(to_skia(trace.color.with_opacity(trace.opacity)), trace.width);
    if trace.dash == Dash::Dashed {
        paint.set_path_effect(skia::PathEffect::dash(&[8.0, 5.0], 0.0));
    }
    for run in &t.runs {
        match run.as_slice() {
            [] => {}
            [(x, y)] => {
                // Isolated point between gaps.
                canvas.draw_circle((*x, *y), trace.width.max(1.5), &fill(paint.color()));
            }
            [first, rest @ ..] => {
                let mut path = skia::Path::new();
                path.move_to(*first);
                for pt in rest {
                    path.line_to(*pt);
                }
                canvas.draw_path(&path, &paint);
            }
        }
    }
}

fn draw_bars(canvas: &skia::Canvas, t: &Projected) {
    let trace = t.trace;
    let paint = fill(to_skia(trace.color.with_opacity(trace.opacity.max(0.05))));
    for bar in &t.bars {
        let rect = skia::Rect::from_ltrb(bar.left, bar.top, bar.right, bar.bottom.max(bar.top + 1.0));
        canvas.draw_rect(rect, &paint);
    }
}

fn draw_labels(canvas: &skia::Canvas, shaper: &TextShaper, spec: &ChartSpec, frame: &Frame, opts: &RenderOptions) {
    let theme = &opts.theme;
    let p = frame.plot;
    let (l, t, r, b) = (p.left as f32, p.top as f32, p.right as f32, p.bottom as f32);
    let label = to_skia(theme.axis_label);
    let tick = to_skia(theme.tick);

    shaper.draw_bold(canvas, &spec.title, l, 28.0, TITLE_SIZE, to_skia(theme.title));

    for tk in &frame.x_ticks {
        shaper.draw_centered(canvas, &tk.label, tk.px, b + 20.0, LABEL_SIZE, tick);
    }
    for tk in &frame.y_ticks {
        shaper.draw_right(canvas, &tk.label, l - 8.0, tk.px + 4.0, LABEL_SIZE, tick);
    }
    for tk in &frame.y2_ticks {
        shaper.draw_left(canvas, &tk.label, r + 8.0, tk.px + 4.0, LABEL_SIZE, tick);
    }

    shaper.draw_centered(canvas, &spec.x_axis.title, (l + r) * 0.5, b + 42.0, LABEL_SIZE + 1.0, label);
    shaper.draw_left(canvas, &spec.y_axis.title, 8.0, t - 8.0, LABEL_SIZE + 1.0, label);
    if let Some(y2) = &spec.y2_axis {
        shaper.draw_right(canvas, &y2.title, opts.width as f32 - 8.0, t - 8.0, LABEL_SIZE + 1.0, label);
    }

    if spec.legend == LegendPlacement::TopRight {
        draw_legend(canvas, shaper, spec, r, t - 30.0, label);
    }
}

/// Horizontal legend row ending at `right`, swatch + name per trace.
fn draw_legend(canvas: &skia::Canvas, shaper: &TextShaper, spec: &ChartSpec, right: f32, y: f32, color: skia::Color) {
    let widths: Vec<f32> = spec
        .traces
        .iter()
        .map(|t| 26.0 + text_width(&t.name, LABEL_SIZE).max(shaper.measure_width(&t.name, LABEL_SIZE)) + 14.0)
        .collect();
    let mut x = right - widths.iter().sum::<f32>();
    for (trace, w) in spec.traces.iter().zip(&widths) {
        let swatch = to_skia(trace.color.with_opacity(trace.opacity.max(0.4)));
        match trace.kind {
            TraceKind::Line => {
                let mut paint = stroke(swatch, trace.width.max(2.0));
                if trace.dash == Dash::Dashed {
                    paint.set_path_effect(skia::PathEffect::dash(&[5.0, 3.0], 0.0));
                }
                canvas.draw_line((x, y - 4.0), (x + 20.0, y - 4.0), &paint);
            }
            TraceKind::Bar => {
                canvas.draw_rect(skia::Rect::from_ltrb(x + 4.0, y - 10.0, x + 16.0, y + 2.0), &fill(swatch));
            }
        }
        shaper.draw_left(canvas, &trace.name, x + 26.0, y, LABEL_SIZE, color);
        x += w;
    }
}
