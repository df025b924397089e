// File: crates/dash-core/src/chart.rs
// Summary: Renderer-agnostic chart specifications for the single-stock price chart and the
//          normalized multi-stock comparison chart.
// Notes:
// - Builders only decide what to draw; `dash-render-skia` turns a `ChartSpec` into PNG/SVG.

use chrono::NaiveDate;

use crate::resolve::{resolve_close, CloseLookup, NotFoundReason, ResolveOptions};
use crate::rolling::{percent_change_from_start, rolling_mean};
use crate::series::CloseSeries;
use crate::table::{PriceTable, RawData};
use crate::types::{palette_color, Rgba, PALETTE};

pub const DEFAULT_CHART_HEIGHT: u32 = 600;
pub const COMPARISON_TITLE: &str = "Stock Performance Comparison - Normalized Returns (%)";

const VOLUME_COLOR: Rgba = Rgba::rgba(158, 202, 225, 128);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceKind {
    Line,
    Bar,
}

/// Which y axis a trace is plotted against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dashed,
}

/// How values are shown in hover text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueFormat {
    Money,
    Percent,
    Count,
}

impl ValueFormat {
    pub fn render(self, v: f64) -> String {
        match self {
            ValueFormat::Money => crate::format::money(v),
            ValueFormat::Percent => crate::format::pct(v),
            ValueFormat::Count => crate::format::count(v),
        }
    }
}

/// Unified: one hover box listing every trace at the hovered date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverMode {
    Unified,
    Closest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendPlacement {
    /// Horizontal row above the plot, anchored right.
    TopRight,
    Hidden,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    pub title: String,
    pub side: AxisSide,
    pub show_grid: bool,
}

impl AxisSpec {
    pub fn new(title: impl Into<String>, side: AxisSide) -> Self {
        Self { title: title.into(), side, show_grid: true }
    }

    pub fn without_grid(mut self) -> Self {
        self.show_grid = false;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    pub side: AxisSide,
    pub x: Vec<NaiveDate>,
    /// NaN marks a gap.
    pub y: Vec<f64>,
    pub color: Rgba,
    pub width: f32,
    pub dash: Dash,
    pub opacity: f32,
    pub value_format: ValueFormat,
}

impl Trace {
    pub fn line(name: impl Into<String>, x: Vec<NaiveDate>, y: Vec<f64>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            kind: TraceKind::Line,
            side: AxisSide::Left,
            x,
            y,
            color,
            width: 2.0,
            dash: Dash::Solid,
            opacity: 1.0,
            value_format: ValueFormat::Money,
        }
    }

    /// Finite (date, value) points in trace order.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied()).filter(|(_, v)| v.is_finite())
    }

    pub fn has_points(&self) -> bool {
        self.points().next().is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub y2_axis: Option<AxisSpec>,
    pub traces: Vec<Trace>,
    pub legend: LegendPlacement,
    pub hover: HoverMode,
    pub height: u32,
}

impl ChartSpec {
    fn new(title: impl Into<String>, y_title: &str) -> Self {
        Self {
            title: title.into(),
            x_axis: AxisSpec::new("Date", AxisSide::Left),
            y_axis: AxisSpec::new(y_title, AxisSide::Left),
            y2_axis: None,
            traces: Vec::new(),
            legend: LegendPlacement::TopRight,
            hover: HoverMode::Unified,
            height: DEFAULT_CHART_HEIGHT,
        }
    }

    pub fn traces_on(&self, side: AxisSide) -> impl Iterator<Item = &Trace> + '_ {
        self.traces.iter().filter(move |t| t.side == side)
    }

    /// Earliest and latest date over all finite points.
    pub fn date_extent(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.traces.iter().flat_map(|t| t.points()).fold(None, |acc, (d, _)| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
    }
}

/// Per-render options coming from the dashboard request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartRequest {
    /// Moving-average window in trading days.
    pub window: usize,
    pub show_volume: bool,
}

impl Default for ChartRequest {
    fn default() -> Self {
        Self { window: 30, show_volume: true }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartOutcome {
    Ready(ChartSpec),
    /// Nothing plottable; the shell shows `message` instead of a chart.
    Empty { title: String, message: String },
}

impl ChartOutcome {
    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            ChartOutcome::Ready(s) => Some(s),
            ChartOutcome::Empty { .. } => None,
        }
    }
}

/// Close line, moving average and (optionally) volume bars for one ticker.
pub fn price_chart(ticker: &str, close: Option<&CloseSeries>, table: Option<&PriceTable>, req: &ChartRequest) -> ChartOutcome {
    let title = format!("{ticker} Stock Analysis");
    let Some(close) = close.filter(|c| c.len() >= 2) else {
        return ChartOutcome::Empty { title, message: format!("Not enough price data to plot {ticker}.") };
    };

    let mut spec = ChartSpec::new(title, "Price (USD)");
    spec.traces.push(Trace::line("Close Price", close.dates().to_vec(), close.values().to_vec(), PALETTE[0]));

    let mut ma = Trace::line(
        format!("{}-Day Moving Average", req.window),
        close.dates().to_vec(),
        rolling_mean(close.values(), req.window),
        PALETTE[1],
    );
    ma.dash = Dash::Dashed;
    spec.traces.push(ma);

    if req.show_volume {
        if let Some((t, volume)) = table.and_then(|t| t.numeric_field("Volume", Some(ticker)).map(|v| (t, v))) {
            spec.traces.push(Trace {
                name: "Volume".to_string(),
                kind: TraceKind::Bar,
                side: AxisSide::Right,
                x: t.index().to_vec(),
                y: volume,
                color: VOLUME_COLOR,
                width: 1.0,
                dash: Dash::Solid,
                opacity: 0.3,
                value_format: ValueFormat::Count,
            });
            spec.y2_axis = Some(AxisSpec::new("Volume", AxisSide::Right).without_grid());
        }
    }
    ChartOutcome::Ready(spec)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing was fetched.
    NoData,
    /// Data exists but no close-like column was found.
    NoClose,
    TooFewPoints,
    /// First close is zero, so returns relative to it are undefined.
    ZeroStart,
}

impl SkipReason {
    pub fn describe(self) -> &'static str {
        match self {
            SkipReason::NoData => "no data",
            SkipReason::NoClose => "no Close data found",
            SkipReason::TooFewPoints => "fewer than 2 price points",
            SkipReason::ZeroStart => "first price is zero",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonChart {
    pub spec: ChartSpec,
    pub skipped: Vec<Skipped>,
}

impl ComparisonChart {
    pub fn is_empty(&self) -> bool {
        self.spec.traces.is_empty()
    }
}

/// One normalized-return line per plottable ticker; the color follows the ticker's input
/// position so a ticker keeps its color when a neighbour is skipped.
pub fn comparison_chart(entries: &[(&str, Option<&RawData>)]) -> ComparisonChart {
    let mut spec = ChartSpec::new(COMPARISON_TITLE, "Return (%)");
    let mut skipped = Vec::new();

    for (i, (ticker, raw)) in entries.iter().enumerate() {
        match comparison_trace(ticker, *raw, palette_color(i)) {
            Ok(trace) => spec.traces.push(trace),
            Err(reason) => skipped.push(Skipped { ticker: (*ticker).to_string(), reason }),
        }
    }
    ComparisonChart { spec, skipped }
}

fn comparison_trace(ticker: &str, raw: Option<&RawData>, color: Rgba) -> Result<Trace, SkipReason> {
    let raw = raw.filter(|r| !r.is_empty()).ok_or(SkipReason::NoData)?;
    let close = match resolve_close(Some(raw), &ResolveOptions::for_ticker(ticker)) {
        CloseLookup::NotFound(NotFoundReason::NoCloseColumn) => return Err(SkipReason::NoClose),
        CloseLookup::NotFound(_) => return Err(SkipReason::TooFewPoints),
        found => found.into_series().ok_or(SkipReason::NoClose)?,
    };
    if close.len() < 2 {
        return Err(SkipReason::TooFewPoints);
    }
    let normalized = percent_change_from_start(&close).ok_or(SkipReason::ZeroStart)?;

    let mut trace = Trace::line(ticker, close.dates().to_vec(), normalized, color);
    trace.value_format = ValueFormat::Percent;
    Ok(trace)
}
