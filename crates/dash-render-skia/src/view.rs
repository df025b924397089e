// File: crates/dash-render-skia/src/view.rs
// Visible data ranges of a chart spec, per axis, with autoscale margins.

use chrono::NaiveDate;
use dash_core::{AxisSide, ChartSpec, TraceKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub x_min: NaiveDate,
    pub x_max: NaiveDate,
    pub y_min: f64,
    pub y_max: f64,
    /// Secondary axis range, present when any trace is plotted against it.
    pub y2: Option<(f64, f64)>,
}

impl ViewState {
    /// Autoscale over all finite points. Bars always include zero. With no points the
    /// view falls back to a unit range.
    pub fn from_spec(spec: &ChartSpec) -> Self {
        let (x_min, x_max) = spec.date_extent().unwrap_or_else(|| {
            let d = NaiveDate::default();
            (d, d.succ_opt().unwrap_or(d))
        });
        let (y_min, y_max) = y_range(spec, AxisSide::Left).unwrap_or((0.0, 1.0));
        let y2 = y_range(spec, AxisSide::Right);
        Self { x_min, x_max, y_min, y_max, y2 }
    }
}

fn y_range(spec: &ChartSpec, side: AxisSide) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut has_bars = false;
    for t in spec.traces_on(side) {
        has_bars |= t.kind == TraceKind::Bar;
        for (_, y) in t.points() {
            lo = lo.min(y);
            hi = hi.max(y);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    if has_bars {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if (hi - lo).abs() < 1e-9 {
        hi = lo + 1.0;
    }
    let m = (hi - lo) * 0.02;
    let lo = if has_bars && lo >= 0.0 { 0.0 } else { lo - m };
    Some((lo, hi + m))
}
