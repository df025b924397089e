// File: crates/dash-core/src/table.rs
// Summary: Price table model: a date index plus flat or (field, ticker) labelled columns.
// Notes:
// - Cells are kept as the source delivered them (numeric or text); numeric views are
//   produced on demand and come back as `Option` so callers pick their own fallback.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::series::NamedSeries;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("column {label} has {got} rows but the index has {expected}")]
    LengthMismatch { label: String, expected: usize, got: usize },
}

/// Column label: a single name, or a two-level (field, ticker) pair as produced by
/// sources that return several tickers in one combined table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnLabel {
    Flat(String),
    Pair { field: String, ticker: String },
}

impl ColumnLabel {
    pub fn flat(name: impl Into<String>) -> Self {
        ColumnLabel::Flat(name.into())
    }

    pub fn pair(field: impl Into<String>, ticker: impl Into<String>) -> Self {
        ColumnLabel::Pair { field: field.into(), ticker: ticker.into() }
    }

    /// Label components in level order.
    pub fn levels(&self) -> Vec<&str> {
        match self {
            ColumnLabel::Flat(name) => vec![name.as_str()],
            ColumnLabel::Pair { field, ticker } => vec![field.as_str(), ticker.as_str()],
        }
    }

    /// Field name (the flat name, or the first level of a pair).
    pub fn field(&self) -> &str {
        match self {
            ColumnLabel::Flat(name) => name,
            ColumnLabel::Pair { field, .. } => field,
        }
    }

    pub fn ticker(&self) -> Option<&str> {
        match self {
            ColumnLabel::Flat(_) => None,
            ColumnLabel::Pair { ticker, .. } => Some(ticker),
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, ColumnLabel::Pair { .. })
    }

    /// Single-string form used for CSV headers (`Close_AAPL` for pairs).
    pub fn flat_name(&self) -> String {
        match self {
            ColumnLabel::Flat(name) => name.clone(),
            ColumnLabel::Pair { field, ticker } => format!("{field}_{ticker}"),
        }
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnLabel::Flat(name) => write!(f, "{name}"),
            ColumnLabel::Pair { field, ticker } => write!(f, "({field}, {ticker})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the column. Blank and `nan`/`null` text cells become NaN; any other
    /// unparsable cell makes the whole column non-numeric (`None`).
    pub fn to_numeric(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Numeric(v) => Some(v.clone()),
            ColumnData::Text(cells) => cells.iter().map(|c| parse_cell(c)).collect(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            ColumnData::Numeric(_) => true,
            ColumnData::Text(cells) => cells.iter().all(|c| parse_cell(c).is_some()),
        }
    }

    /// Cell as display/export text; missing numeric cells are blank.
    pub fn cell_text(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) => match v.get(row) {
                Some(x) if x.is_finite() => format!("{x}"),
                _ => String::new(),
            },
            ColumnData::Text(v) => v.get(row).cloned().unwrap_or_default(),
        }
    }

    fn head(&self, n: usize) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(v.iter().take(n).copied().collect()),
            ColumnData::Text(v) => ColumnData::Text(v.iter().take(n).cloned().collect()),
        }
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub label: ColumnLabel,
    pub data: ColumnData,
}

/// Rows indexed by trading date. Duplicate and missing dates are tolerated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceTable {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl PriceTable {
    pub fn new(index: Vec<NaiveDate>) -> Self {
        Self { index, columns: Vec::new() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, label: ColumnLabel, data: ColumnData) -> Result<Self, TableError> {
        self.push_column(label, data)?;
        Ok(self)
    }

    pub fn push_column(&mut self, label: ColumnLabel, data: ColumnData) -> Result<(), TableError> {
        if data.len() != self.index.len() {
            return Err(TableError::LengthMismatch {
                label: label.to_string(),
                expected: self.index.len(),
                got: data.len(),
            });
        }
        self.columns.push(Column { label, data });
        Ok(())
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// A table with no rows or no columns carries no data.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    pub fn has_pair_labels(&self) -> bool {
        self.columns.iter().any(|c| c.label.is_pair())
    }

    pub fn column(&self, label: &ColumnLabel) -> Option<&Column> {
        self.columns.iter().find(|c| &c.label == label)
    }

    /// Numeric values of the first usable column for `field`. Pair columns for `ticker`
    /// are tried first when a ticker is given. Non-numeric candidates count as absent.
    pub fn numeric_field(&self, field: &str, ticker: Option<&str>) -> Option<Vec<f64>> {
        let candidates = self
            .columns
            .iter()
            .filter(|c| c.label.field().eq_ignore_ascii_case(field));
        let (preferred, rest): (Vec<&Column>, Vec<&Column>) = candidates.partition(|c| match (ticker, c.label.ticker()) {
            (Some(want), Some(have)) => have.eq_ignore_ascii_case(want),
            _ => false,
        });
        preferred.into_iter().chain(rest).find_map(|c| c.data.to_numeric())
    }

    /// First `n` rows, all columns.
    pub fn head(&self, n: usize) -> PriceTable {
        PriceTable {
            index: self.index.iter().take(n).copied().collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column { label: c.label.clone(), data: c.data.head(n) })
                .collect(),
        }
    }

    /// Distinct tickers named by pair labels, in first-seen order.
    pub fn tickers(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for t in self.columns.iter().filter_map(|c| c.label.ticker()) {
            if !out.iter().any(|seen| seen == t) {
                out.push(t.to_string());
            }
        }
        out
    }

    /// Sub-table for one ticker of a combined table: its pair columns become flat columns.
    /// Flat columns are kept as they are.
    pub fn for_ticker(&self, ticker: &str) -> PriceTable {
        let columns = self
            .columns
            .iter()
            .filter_map(|c| match &c.label {
                ColumnLabel::Flat(_) => Some(c.clone()),
                ColumnLabel::Pair { field, ticker: t } if t.eq_ignore_ascii_case(ticker) => {
                    Some(Column { label: ColumnLabel::Flat(field.clone()), data: c.data.clone() })
                }
                ColumnLabel::Pair { .. } => None,
            })
            .collect();
        PriceTable { index: self.index.clone(), columns }
    }
}

/// What a fetch yields for one ticker: a table, or a bare named series.
#[derive(Clone, Debug, PartialEq)]
pub enum RawData {
    Table(PriceTable),
    Series(NamedSeries),
}

impl RawData {
    pub fn is_empty(&self) -> bool {
        match self {
            RawData::Table(t) => t.is_empty(),
            RawData::Series(s) => s.is_empty(),
        }
    }

    /// Row count of the underlying data.
    pub fn len(&self) -> usize {
        match self {
            RawData::Table(t) => t.len(),
            RawData::Series(s) => s.len(),
        }
    }

    pub fn as_table(&self) -> Option<&PriceTable> {
        match self {
            RawData::Table(t) => Some(t),
            RawData::Series(_) => None,
        }
    }

    /// The table as seen by one ticker: combined tables are narrowed to that ticker's
    /// columns, flat tables are returned as they are. Bare series have no table.
    pub fn table_for(&self, ticker: &str) -> Option<PriceTable> {
        let t = self.as_table()?;
        Some(if t.has_pair_labels() { t.for_ticker(ticker) } else { t.clone() })
    }
}

impl From<PriceTable> for RawData {
    fn from(t: PriceTable) -> Self {
        RawData::Table(t)
    }
}

impl From<NamedSeries> for RawData {
    fn from(s: NamedSeries) -> Self {
        RawData::Series(s)
    }
}
