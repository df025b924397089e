// File: crates/dash-core/src/export.rs
// Summary: CSV export of a fetched table and the date-aligned multi-ticker join.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::resolve::{resolve_close, ResolveOptions};
use crate::table::{PriceTable, RawData};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer flush failed: {0}")]
    Flush(String),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

const DATE_FMT: &str = "%Y-%m-%d";

pub fn single_file_name(ticker: &str) -> String {
    format!("{ticker}_stock_data.csv")
}

pub fn comparison_file_name<S: AsRef<str>>(tickers: &[S]) -> String {
    let joined: Vec<&str> = tickers.iter().map(AsRef::as_ref).collect();
    format!("stock_comparison_{}.csv", joined.join("_"))
}

/// The table as fetched: a `Date` column followed by every column, pair labels flattened.
pub fn table_to_csv(table: &PriceTable) -> Result<String, ExportError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["Date".to_string()];
    header.extend(table.columns().iter().map(|c| c.label.flat_name()));
    w.write_record(&header)?;

    for (row, date) in table.index().iter().enumerate() {
        let mut record = vec![date.format(DATE_FMT).to_string()];
        record.extend(table.columns().iter().map(|c| c.data.cell_text(row)));
        w.write_record(&record)?;
    }
    finish(w)
}

/// Outer join on date of `{T}_Close` (when a close resolves) and `{T}_Volume` (when the
/// table has a numeric Volume column) for each ticker, in input order. Missing cells are blank.
pub fn comparison_to_csv(entries: &[(&str, Option<&RawData>)]) -> Result<String, ExportError> {
    let mut names: Vec<String> = Vec::new();
    let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();

    let mut add_column = |name: String, points: Vec<(NaiveDate, f64)>| {
        let col = names.len();
        names.push(name);
        for (d, v) in points {
            let cells = rows.entry(d).or_default();
            cells.resize(col + 1, None);
            cells[col] = Some(v);
        }
    };

    for (ticker, raw) in entries {
        if let Some(close) = resolve_close(*raw, &ResolveOptions::for_ticker(*ticker)).into_series() {
            add_column(format!("{ticker}_Close"), close.points().collect());
        }
        let volume = raw.and_then(|r| r.table_for(ticker)).and_then(|t| {
            let v = t.numeric_field("Volume", None)?;
            Some(t.index().iter().copied().zip(v).filter(|(_, x)| x.is_finite()).collect::<Vec<_>>())
        });
        if let Some(points) = volume {
            add_column(format!("{ticker}_Volume"), points);
        }
    }

    let mut w = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["Date".to_string()];
    header.extend(names.iter().cloned());
    w.write_record(&header)?;
    for (date, cells) in &rows {
        let mut record = vec![date.format(DATE_FMT).to_string()];
        record.extend((0..names.len()).map(|i| match cells.get(i).copied().flatten() {
            Some(v) => format!("{v}"),
            None => String::new(),
        }));
        w.write_record(&record)?;
    }
    finish(w)
}

fn finish(w: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = w.into_inner().map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
