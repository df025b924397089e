// File: crates/dash-render-skia/src/layout.rs
// Summary: Backend-neutral frame layout: plot rect, scales, ticks and traces projected to
//          pixel space. The PNG and SVG renderers both draw from a `Frame`.

use chrono::NaiveDate;
use dash_core::{AxisSide, ChartSpec, Trace, TraceKind, ValueFormat};

use crate::downsample::{finite_runs, fit_runs};
use crate::geometry::RectI32;
use crate::grid::{date_ticks, nice_ticks};
use crate::scale::{DateScale, ValueScale};
use crate::types::RenderOptions;
use crate::view::ViewState;

pub(crate) struct Tick {
    pub px: f32,
    pub label: String,
}

pub(crate) struct Bar {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// One trace in pixel space: polyline runs for lines, rectangles for bars.
pub(crate) struct Projected<'a> {
    pub trace: &'a Trace,
    pub runs: Vec<Vec<(f32, f32)>>,
    pub bars: Vec<Bar>,
}

pub(crate) struct Frame<'a> {
    pub plot: RectI32,
    pub x: DateScale,
    pub y: ValueScale,
    pub y2: Option<ValueScale>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub y2_ticks: Vec<Tick>,
    pub traces: Vec<Projected<'a>>,
}

impl<'a> Frame<'a> {
    pub fn new(spec: &'a ChartSpec, opts: &RenderOptions) -> Self {
        let plot = RectI32::plot_area(opts);
        let view = ViewState::from_spec(spec);
        let (l, t, r, b) = (plot.left as f32, plot.top as f32, plot.right as f32, plot.bottom as f32);

        let x = DateScale::new(l, r, view.x_min, view.x_max);
        let y = ValueScale::new_linear(t, b, view.y_min, view.y_max);
        let y2 = view.y2.map(|(lo, hi)| ValueScale::new_linear(t, b, lo, hi));

        let span_days = (x.end - x.start).num_days();
        let x_ticks = date_ticks(x.start, x.end, 6)
            .into_iter()
            .map(|d| Tick { px: x.to_px(d), label: date_label(d, span_days) })
            .collect();
        let y_format = axis_format(spec, AxisSide::Left);
        let y_ticks = value_ticks(&y, y_format);
        let y2_ticks = y2.as_ref().map(|s| value_ticks(s, ValueFormat::Count)).unwrap_or_default();

        let traces = spec
            .traces
            .iter()
            .map(|trace| {
                let scale = match (trace.side, y2.as_ref()) {
                    (AxisSide::Right, Some(s)) => s,
                    _ => &y,
                };
                project(trace, &x, scale, opts.max_points)
            })
            .collect();

        Self { plot, x, y, y2, x_ticks, y_ticks, y2_ticks, traces }
    }
}

fn project<'a>(trace: &'a Trace, x: &DateScale, y: &ValueScale, max_points: usize) -> Projected<'a> {
    match trace.kind {
        TraceKind::Line => {
            let xy: Vec<(f64, f64)> = trace.x.iter().zip(&trace.y).map(|(d, v)| (x.logical(*d), *v)).collect();
            let runs = fit_runs(finite_runs(&xy), max_points)
                .into_iter()
                .map(|run| run.into_iter().map(|(lx, v)| (x.logical_to_px(lx), y.to_px(v))).collect())
                .collect();
            Projected { trace, runs, bars: Vec::new() }
        }
        TraceKind::Bar => {
            let half = (x.day_px() * 0.4).max(0.5);
            let base = y.to_px_clamped(0.0);
            let bars = trace
                .points()
                .map(|(d, v)| {
                    let cx = x.to_px(d);
                    let top = y.to_px_clamped(v);
                    Bar { left: cx - half, top: top.min(base), right: cx + half, bottom: top.max(base) }
                })
                .collect();
            Projected { trace, runs: Vec::new(), bars }
        }
    }
}

fn axis_format(spec: &ChartSpec, side: AxisSide) -> ValueFormat {
    spec.traces_on(side).next().map_or(ValueFormat::Money, |t| t.value_format)
}

fn value_ticks(scale: &ValueScale, format: ValueFormat) -> Vec<Tick> {
    let ticks = nice_ticks(scale.vmin, scale.vmax, 6);
    let step = match ticks.as_slice() {
        [a, b, ..] => b - a,
        _ => 1.0,
    };
    // Enough decimals to tell neighbouring ticks apart.
    let decimals = if step >= 1.0 { 0 } else { (-step.log10()).ceil() as usize };
    ticks
        .into_iter()
        .map(|v| Tick { px: scale.to_px(v), label: tick_label(v, format, decimals) })
        .collect()
}

fn tick_label(v: f64, format: ValueFormat, decimals: usize) -> String {
    match format {
        ValueFormat::Money => format!("{v:.decimals$}"),
        ValueFormat::Percent => format!("{v:.decimals$}%"),
        ValueFormat::Count => compact(v),
    }
}

/// 1.2M / 350k style labels for large counts.
fn compact(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.0}k", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

fn date_label(d: NaiveDate, span_days: i64) -> String {
    if span_days > 62 {
        d.format("%b %Y").to_string()
    } else {
        d.format("%b %d").to_string()
    }
}

/// Rough label width for layout without a shaper.
pub(crate) fn text_width(s: &str, size: f32) -> f32 {
    s.chars().count() as f32 * size * 0.55
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_labels() {
        assert_eq!(compact(1_500_000.0), "1.5M");
        assert_eq!(compact(350_000.0), "350k");
        assert_eq!(compact(2_000_000_000.0), "2.0B");
        assert_eq!(compact(12.0), "12");
    }
}
