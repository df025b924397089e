// File: crates/dash-core/src/metrics.rs
// Summary: Summary figures for one ticker (price cards, returns, volatility, volume stats)
//          and the per-ticker rows of the comparison table.
// Notes:
// - Optional inputs (High/Low/Volume columns) degrade to a documented fallback and the
//   figure records where it came from through `Provenance`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::resolve::{resolve_close, ResolveOptions};
use crate::rolling::pct_change;
use crate::series::{sample_std, CloseSeries};
use crate::table::{PriceTable, RawData};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("not enough data for metrics: need at least {required} price point(s), found {found}")]
    NotEnoughData { found: usize, required: usize },
}

/// Where a figure came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// The dedicated column (High, Low, Volume).
    Column,
    /// Derived from the close series because the column was missing or unusable.
    CloseFallback,
    /// No source at all; a neutral default was used.
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Provenance,
}

impl<T> Sourced<T> {
    fn new(value: T, source: Provenance) -> Self {
        Self { value, source }
    }

    pub fn is_fallback(&self) -> bool {
        self.source != Provenance::Column
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TradingStats {
    pub avg_price: f64,
    /// Sample standard deviation of the close; `None` below two points.
    pub price_std: Option<f64>,
    pub total_volume: Option<f64>,
    /// Day with the highest traded volume and that volume.
    pub max_volume: Option<(NaiveDate, f64)>,
    pub trading_days: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricsSnapshot {
    pub current: f64,
    pub prior: f64,
    pub change: f64,
    pub change_pct: f64,
    pub high: Sourced<f64>,
    pub low: Sourced<f64>,
    pub avg_volume: Sourced<f64>,
    pub total_return_pct: Option<f64>,
    pub volatility_pct: Option<f64>,
    pub stats: TradingStats,
}

/// Compute every summary figure for one close series and its (optional) source table.
pub fn compute_snapshot(close: &CloseSeries, table: Option<&PriceTable>) -> Result<MetricsSnapshot, MetricsError> {
    let (Some(current), Some(first)) = (close.last(), close.first()) else {
        return Err(MetricsError::NotEnoughData { found: 0, required: 1 });
    };
    let prior = close.prior().unwrap_or(current);
    let change = current - prior;
    let change_pct = if prior == 0.0 { 0.0 } else { change / prior * 100.0 };

    let high = column_extreme(table, "High", f64::max)
        .map(|v| Sourced::new(v, Provenance::Column))
        .unwrap_or_else(|| Sourced::new(close.max().unwrap_or(current), Provenance::CloseFallback));
    let low = column_extreme(table, "Low", f64::min)
        .map(|v| Sourced::new(v, Provenance::Column))
        .unwrap_or_else(|| Sourced::new(close.min().unwrap_or(current), Provenance::CloseFallback));

    let volume = table.and_then(volume_points);
    let avg_volume = volume
        .as_ref()
        .and_then(|pts| mean(pts.iter().map(|(_, v)| *v)))
        .map(|v| Sourced::new(v, Provenance::Column))
        .unwrap_or(Sourced::new(0.0, Provenance::Default));

    let total_return_pct = (close.len() >= 2).then(|| if first == 0.0 { 0.0 } else { (current / first - 1.0) * 100.0 });

    let stats = TradingStats {
        avg_price: close.mean().unwrap_or(current),
        price_std: close.std_dev(),
        total_volume: volume.as_ref().filter(|p| !p.is_empty()).map(|p| p.iter().map(|(_, v)| v).sum()),
        max_volume: volume.as_ref().and_then(|p| {
            p.iter().copied().fold(None, |best: Option<(NaiveDate, f64)>, (d, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((d, v)),
            })
        }),
        trading_days: table.map_or(close.len(), PriceTable::len),
    };

    Ok(MetricsSnapshot {
        current,
        prior,
        change,
        change_pct,
        high,
        low,
        avg_volume,
        total_return_pct,
        volatility_pct: volatility_pct(close),
        stats,
    })
}

/// Sample standard deviation of period returns, in percent. Non-finite returns are
/// ignored; a single usable return yields 0.
pub fn volatility_pct(close: &CloseSeries) -> Option<f64> {
    if close.len() < 2 {
        return None;
    }
    let returns: Vec<f64> = pct_change(close.values()).into_iter().filter(|r| r.is_finite()).collect();
    Some(sample_std(&returns).map_or(0.0, |s| s * 100.0))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn column_extreme(table: Option<&PriceTable>, field: &str, pick: fn(f64, f64) -> f64) -> Option<f64> {
    let values = table?.numeric_field(field, None)?;
    values.into_iter().filter(|v| v.is_finite()).reduce(pick)
}

/// Finite volume observations paired with their dates.
fn volume_points(table: &PriceTable) -> Option<Vec<(NaiveDate, f64)>> {
    let values = table.numeric_field("Volume", None)?;
    Some(
        table
            .index()
            .iter()
            .copied()
            .zip(values)
            .filter(|(_, v)| v.is_finite())
            .collect(),
    )
}

/// One line of the multi-ticker comparison table. `snapshot` is `None` when no usable
/// close series was found for the ticker.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonRow {
    pub ticker: String,
    pub snapshot: Option<MetricsSnapshot>,
}

impl ComparisonRow {
    pub fn has_data(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// Build comparison rows in input order; tickers without price data are kept as empty rows.
pub fn comparison_rows(entries: &[(&str, Option<&RawData>)]) -> Vec<ComparisonRow> {
    entries
        .iter()
        .map(|(ticker, raw)| {
            let close = resolve_close(*raw, &ResolveOptions::for_ticker(*ticker)).into_series();
            let table = raw.and_then(|r| r.table_for(ticker));
            let snapshot = close.and_then(|c| compute_snapshot(&c, table.as_ref()).ok());
            ComparisonRow { ticker: (*ticker).to_string(), snapshot }
        })
        .collect()
}
