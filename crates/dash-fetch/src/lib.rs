// File: crates/dash-fetch/src/lib.rs
// Summary: Market-data sources behind one blocking `PriceSource` trait.
// Notes:
// - "No data" is an empty table, never an error. Errors are reserved for transport,
//   parse and I/O failures so callers can tell a bad ticker from a broken fetch.

use chrono::NaiveDate;
use dash_core::{RawData, TableError};
use thiserror::Error;

pub mod csv_dir;
pub mod memory;
pub mod yahoo;

pub use csv_dir::CsvDirSource;
pub use memory::StaticSource;
pub use yahoo::YahooSource;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("API error [{code}]: {description}")]
    Api { code: String, description: String },
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("malformed data in {path}: {message}")]
    Format { path: String, message: String },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("{0}")]
    Unavailable(String),
}

/// Daily price history for one ticker over `[start, end)`.
pub trait PriceSource {
    fn name(&self) -> &str;

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<RawData, FetchError>;
}

pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), FetchError> {
    if start > end {
        return Err(FetchError::InvalidRange { start, end });
    }
    Ok(())
}
