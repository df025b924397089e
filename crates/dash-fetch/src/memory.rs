// File: crates/dash-fetch/src/memory.rs
// Summary: In-memory source with canned per-ticker results, for tests and offline demos.

use std::collections::HashMap;

use chrono::NaiveDate;
use dash_core::{PriceTable, RawData};
use tracing::debug;

use crate::{check_range, FetchError, PriceSource};

#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: HashMap<String, Result<RawData, String>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, ticker: &str, data: impl Into<RawData>) -> Self {
        self.entries.insert(ticker.to_string(), Ok(data.into()));
        self
    }

    /// Every fetch of `ticker` fails with `message`.
    pub fn with_failure(mut self, ticker: &str, message: impl Into<String>) -> Self {
        self.entries.insert(ticker.to_string(), Err(message.into()));
        self
    }
}

impl PriceSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    // Stored data is returned whole; the date range is only validated.
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<RawData, FetchError> {
        check_range(start, end)?;
        debug!(ticker, "static lookup");
        match self.entries.get(ticker) {
            Some(Ok(data)) => Ok(data.clone()),
            Some(Err(msg)) => Err(FetchError::Unavailable(msg.clone())),
            None => Ok(RawData::Table(PriceTable::empty())),
        }
    }
}
