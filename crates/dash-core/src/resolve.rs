// File: crates/dash-core/src/resolve.rs
// Summary: Close-series resolution over flat, (field, ticker) and bare-series inputs.
// Notes:
// - The outcome is a tagged `CloseLookup` so consumers branch on how the column was found
//   instead of re-guessing the table shape themselves.

use chrono::NaiveDate;

use crate::rolling::rolling_mean;
use crate::series::{CloseSeries, NamedSeries, CLOSE_LABEL};
use crate::table::{Column, PriceTable, RawData};

/// Accepted close-column names, compared case-insensitively, in lookup order.
pub const CLOSE_ALIASES: [&str; 4] = ["close", "adj close", "adj_close", "adjclose"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Minimum number of finite points the resolved series must carry.
    pub min_rows: usize,
    /// Fall back to the first numeric column when no close-like label exists.
    /// This is a guess about the table, not a guarantee.
    pub numeric_fallback: bool,
    /// With (field, ticker) labels, try this ticker's columns first.
    pub ticker: Option<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { min_rows: 1, numeric_fallback: false, ticker: None }
    }
}

impl ResolveOptions {
    pub fn for_ticker(ticker: impl Into<String>) -> Self {
        Self { ticker: Some(ticker.into()), ..Self::default() }
    }

    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    pub fn with_numeric_fallback(mut self, on: bool) -> Self {
        self.numeric_fallback = on;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No input at all.
    Absent,
    /// Input without rows or columns.
    Empty,
    /// Rows exist but no usable close-like column.
    NoCloseColumn,
    TooFewRows { found: usize, required: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum CloseLookup {
    /// Bare series, or a column labelled exactly `Close`.
    Exact(CloseSeries),
    /// Matched through a case-insensitive alias; `matched` is the label as found.
    Alias { series: CloseSeries, matched: String },
    /// First numeric column, used only when the fallback is enabled.
    Heuristic { series: CloseSeries, column: String },
    NotFound(NotFoundReason),
}

impl CloseLookup {
    pub fn series(&self) -> Option<&CloseSeries> {
        match self {
            CloseLookup::Exact(s) | CloseLookup::Alias { series: s, .. } | CloseLookup::Heuristic { series: s, .. } => Some(s),
            CloseLookup::NotFound(_) => None,
        }
    }

    pub fn into_series(self) -> Option<CloseSeries> {
        match self {
            CloseLookup::Exact(s) | CloseLookup::Alias { series: s, .. } | CloseLookup::Heuristic { series: s, .. } => Some(s),
            CloseLookup::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, CloseLookup::NotFound(_))
    }

    pub fn not_found_reason(&self) -> Option<NotFoundReason> {
        match self {
            CloseLookup::NotFound(r) => Some(*r),
            _ => None,
        }
    }
}

/// Locate the closing-price series in `data`.
pub fn resolve_close(data: Option<&RawData>, opts: &ResolveOptions) -> CloseLookup {
    let lookup = match data {
        None => return CloseLookup::NotFound(NotFoundReason::Absent),
        Some(RawData::Series(s)) => resolve_series(s),
        Some(RawData::Table(t)) => resolve_table(t, opts),
    };
    enforce_min_rows(lookup, opts.min_rows)
}

fn resolve_series(s: &NamedSeries) -> CloseLookup {
    if s.is_empty() {
        return CloseLookup::NotFound(NotFoundReason::Empty);
    }
    // Whatever the series was called, it is taken as the close.
    CloseLookup::Exact(CloseSeries::from_points(&s.index, &s.values))
}

fn resolve_table(t: &PriceTable, opts: &ResolveOptions) -> CloseLookup {
    if t.is_empty() {
        return CloseLookup::NotFound(NotFoundReason::Empty);
    }
    match match_close(t, opts) {
        Some(m) => m.into_lookup(t.index()),
        None => CloseLookup::NotFound(NotFoundReason::NoCloseColumn),
    }
}

/// The column picked as the close, with its values still aligned to the table rows.
struct CloseColumn<'a> {
    column: &'a Column,
    values: Vec<f64>,
    heuristic: bool,
}

impl CloseColumn<'_> {
    fn into_lookup(self, index: &[NaiveDate]) -> CloseLookup {
        let series = CloseSeries::from_points(index, &self.values);
        if self.heuristic {
            CloseLookup::Heuristic { series, column: self.column.label.to_string() }
        } else if self.column.label.field() == CLOSE_LABEL {
            CloseLookup::Exact(series)
        } else {
            CloseLookup::Alias { series, matched: self.column.label.to_string() }
        }
    }
}

fn match_close<'a>(t: &'a PriceTable, opts: &ResolveOptions) -> Option<CloseColumn<'a>> {
    if t.is_empty() {
        return None;
    }
    if t.has_pair_labels() {
        if let Some(found) = match_pairs(t, opts.ticker.as_deref()) {
            return Some(found);
        }
    }
    if let Some(found) = match_flat(t) {
        return Some(found);
    }
    if opts.numeric_fallback {
        return t
            .columns()
            .iter()
            .find_map(numeric)
            .map(|found| CloseColumn { heuristic: true, ..found });
    }
    None
}

fn is_alias(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    CLOSE_ALIASES.iter().any(|a| *a == lower)
}

fn match_pairs<'a>(t: &'a PriceTable, ticker: Option<&str>) -> Option<CloseColumn<'a>> {
    let pairs: Vec<&Column> = t.columns().iter().filter(|c| c.label.is_pair()).collect();

    let wants_ticker = |c: &Column| match (ticker, c.label.ticker()) {
        (Some(want), Some(have)) => have.eq_ignore_ascii_case(want),
        _ => false,
    };

    // Pass 1: field level, requested ticker first, then label order.
    let field_hits = pairs
        .iter()
        .filter(|c| wants_ticker(c))
        .chain(pairs.iter().filter(|c| !wants_ticker(c)))
        .filter(|c| is_alias(c.label.field()));
    for c in field_hits {
        if let Some(found) = numeric(*c) {
            return Some(found);
        }
    }

    // Pass 2: any level of the label.
    pairs
        .iter()
        .filter(|c| c.label.levels().iter().any(|l| is_alias(l)))
        .find_map(|c| numeric(*c))
}

fn match_flat(t: &PriceTable) -> Option<CloseColumn<'_>> {
    let flats: Vec<&Column> = t.columns().iter().filter(|c| !c.label.is_pair()).collect();

    if let Some(c) = flats.iter().find(|c| c.label.field() == CLOSE_LABEL && c.data.is_numeric()) {
        return numeric(*c);
    }
    for alias in CLOSE_ALIASES {
        for c in flats.iter().filter(|c| c.label.field().trim().eq_ignore_ascii_case(alias)) {
            if let Some(found) = numeric(*c) {
                return Some(found);
            }
        }
    }
    None
}

/// `None` when the column does not coerce to numbers.
fn numeric(c: &Column) -> Option<CloseColumn<'_>> {
    c.data.to_numeric().map(|values| CloseColumn { column: c, values, heuristic: false })
}

fn enforce_min_rows(lookup: CloseLookup, required: usize) -> CloseLookup {
    match lookup.series().map(|s| s.len()) {
        Some(found) if found < required.max(1) => {
            if found == 0 {
                CloseLookup::NotFound(NotFoundReason::Empty)
            } else {
                CloseLookup::NotFound(NotFoundReason::TooFewRows { found, required })
            }
        }
        _ => lookup,
    }
}

/// Rolling mean of the resolved close, one value per input row in input order (empty for
/// absent input). Windows run over the rows in date order, and a gap in the close makes every
/// window that covers it NaN. With no resolvable close every row is NaN.
pub fn rolling_average(data: Option<&RawData>, window: usize) -> Vec<f64> {
    let (index, values) = match data {
        None => return Vec::new(),
        Some(RawData::Series(s)) => (s.index.as_slice(), Some(s.values.clone())),
        Some(RawData::Table(t)) => (t.index(), match_close(t, &ResolveOptions::default()).map(|m| m.values)),
    };
    let Some(values) = values else {
        return vec![f64::NAN; index.len()];
    };

    let mut order: Vec<usize> = (0..index.len()).collect();
    order.sort_by_key(|&i| index[i]);
    let chronological: Vec<f64> = order.iter().map(|&i| values.get(i).copied().unwrap_or(f64::NAN)).collect();
    let mut out = vec![f64::NAN; index.len()];
    for (&row, mean) in order.iter().zip(rolling_mean(&chronological, window)) {
        out[row] = mean;
    }
    out
}
