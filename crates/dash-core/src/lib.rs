// File: crates/dash-core/src/lib.rs
// Summary: Core library entry point; exports the price model, Close resolver, metrics and chart specs.

pub mod table;
pub mod series;
pub mod resolve;
pub mod rolling;
pub mod metrics;
pub mod types;
pub mod chart;
pub mod export;
pub mod format;

pub use table::{Column, ColumnData, ColumnLabel, PriceTable, RawData, TableError};
pub use series::{CloseSeries, NamedSeries, CLOSE_LABEL};
pub use resolve::{resolve_close, rolling_average, CloseLookup, NotFoundReason, ResolveOptions, CLOSE_ALIASES};
pub use rolling::{percent_change_from_start, pct_change, rolling_mean};
pub use metrics::{comparison_rows, compute_snapshot, ComparisonRow, MetricsError, MetricsSnapshot, Provenance, Sourced, TradingStats};
pub use types::{palette_color, Rgba, PALETTE};
pub use chart::{
    comparison_chart, price_chart, AxisSide, AxisSpec, ChartOutcome, ChartRequest, ChartSpec, ComparisonChart,
    Dash, HoverMode, LegendPlacement, SkipReason, Skipped, Trace, TraceKind, ValueFormat,
};
pub use export::{comparison_file_name, comparison_to_csv, single_file_name, table_to_csv, ExportError};
