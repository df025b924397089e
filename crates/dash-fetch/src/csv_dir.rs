// File: crates/dash-fetch/src/csv_dir.rs
// Summary: Offline source reading `{dir}/{TICKER}.csv`, with flat or two-row (field, ticker) headers.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dash_core::{ColumnData, ColumnLabel, PriceTable, RawData};
use tracing::{debug, info, warn};

use crate::{check_range, FetchError, PriceSource};

#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }
}

impl PriceSource for CsvDirSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<RawData, FetchError> {
        check_range(start, end)?;
        let path = self.path_for(ticker);
        if !path.exists() {
            warn!(ticker, path = %path.display(), "no CSV file for ticker");
            return Ok(RawData::Table(PriceTable::empty()));
        }
        let table = load_price_csv(&path)?;
        let table = within(&table, start, end)?;
        info!(ticker, rows = table.len(), "loaded from CSV");
        Ok(RawData::Table(table))
    }
}

/// Load a price CSV. The first column is the date. Headers are either one row of names,
/// or a `Price,...` row followed by a `Ticker,...` row (and optionally a `Date,,,` row),
/// which yields (field, ticker) labels.
pub fn load_price_csv(path: &Path) -> Result<PriceTable, FetchError> {
    let shown = path.display().to_string();
    let csv_err = |source| FetchError::Csv { path: shown.clone(), source };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>().map_err(csv_err)?;

    let first = |r: &csv::StringRecord| r.get(0).unwrap_or("").trim().to_ascii_lowercase();
    let Some(header) = rows.first() else {
        return Ok(PriceTable::empty());
    };

    let two_level = rows.len() > 1 && first(header) == "price" && first(&rows[1]) == "ticker";
    let (labels, mut body_start): (Vec<ColumnLabel>, usize) = if two_level {
        let tickers = &rows[1];
        let labels = header
            .iter()
            .skip(1)
            .enumerate()
            .map(|(i, field)| ColumnLabel::pair(field.trim(), tickers.get(i + 1).unwrap_or("").trim()))
            .collect();
        (labels, 2)
    } else {
        (header.iter().skip(1).map(|h| ColumnLabel::flat(h.trim())).collect(), 1)
    };
    if two_level && rows.get(2).is_some_and(|r| first(r) == "date" && r.iter().skip(1).all(|c| c.trim().is_empty())) {
        body_start += 1;
    }
    debug!(path = %shown, columns = labels.len(), two_level, "parsed CSV header");

    let mut index = Vec::new();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); labels.len()];
    let mut skipped = 0usize;
    for rec in &rows[body_start..] {
        let Some(date) = rec.get(0).and_then(parse_date) else {
            skipped += 1;
            continue;
        };
        index.push(date);
        for (i, col) in cells.iter_mut().enumerate() {
            col.push(rec.get(i + 1).unwrap_or("").trim().to_string());
        }
    }
    if skipped > 0 {
        warn!(path = %shown, skipped, "rows without a parseable date were skipped");
    }

    let mut table = PriceTable::new(index);
    for (label, col) in labels.into_iter().zip(cells) {
        let data = ColumnData::Text(col);
        let data = match data.to_numeric() {
            Some(v) => ColumnData::Numeric(v),
            None => data,
        };
        table.push_column(label, data)?;
    }
    Ok(table)
}

/// `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim();
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Rows with `start <= date < end`.
fn within(table: &PriceTable, start: NaiveDate, end: NaiveDate) -> Result<PriceTable, FetchError> {
    let keep: Vec<usize> = (0..table.len())
        .filter(|&i| {
            let d = table.index()[i];
            d >= start && d < end
        })
        .collect();
    if keep.len() == table.len() {
        return Ok(table.clone());
    }
    let mut out = PriceTable::new(keep.iter().map(|&i| table.index()[i]).collect());
    for c in table.columns() {
        let data = match &c.data {
            ColumnData::Numeric(v) => ColumnData::Numeric(keep.iter().map(|&i| v[i]).collect()),
            ColumnData::Text(v) => ColumnData::Text(keep.iter().map(|&i| v[i].clone()).collect()),
        };
        out.push_column(c.label.clone(), data)?;
    }
    Ok(out)
}
