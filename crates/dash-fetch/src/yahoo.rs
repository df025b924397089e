// File: crates/dash-fetch/src/yahoo.rs
// Summary: Yahoo Finance chart API source (blocking), parsed into a flat OHLCV table.

use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use dash_core::{ColumnData, ColumnLabel, PriceTable, RawData};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{check_range, FetchError, PriceSource};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance client
#[derive(Debug, Clone)]
pub struct YahooSource {
    base_url: String,
}

impl Default for YahooSource {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooSource {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    fn build_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            symbol,
            midnight_utc(start),
            midnight_utc(end)
        )
    }
}

impl PriceSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<RawData, FetchError> {
        check_range(start, end)?;
        let url = self.build_url(ticker, start, end);
        debug!(%url, "requesting chart data");

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client.get(&url).send()?;
        let status = response.status();
        let text = response.text()?;

        // Unknown symbols come back as 404 with a JSON "Not Found" body; let the parser decide.
        let table = match parse_response(&text) {
            Ok(t) => t,
            Err(FetchError::Parse(_)) if !status.is_success() => {
                return Err(FetchError::Status { status: status.as_u16(), body: truncate(&text, 200) });
            }
            Err(e) => return Err(e),
        };
        info!(ticker, rows = table.len(), "fetched");
        Ok(RawData::Table(table))
    }
}

fn midnight_utc(d: NaiveDate) -> i64 {
    d.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp())
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((i, _)) => format!("{}...", &s[..i]),
        None => s.to_string(),
    }
}

/// Parse a chart response into `Open, High, Low, Close, [Adj Close,] Volume`.
/// Nulls become NaN and rows are kept, so partial days survive. An unknown symbol or
/// an empty result yields an empty table.
fn parse_response(json: &str) -> Result<PriceTable, FetchError> {
    let response: YahooResponse = serde_json::from_str(json)?;

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            warn!(description = %error.description, "symbol not found");
            return Ok(PriceTable::empty());
        }
        return Err(FetchError::Api { code: error.code, description: error.description });
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceTable::empty());
    };
    if data.timestamp.is_empty() {
        return Ok(PriceTable::empty());
    }

    let offset = data.meta.as_ref().map_or(0, |m| m.gmtoffset);
    let index = data
        .timestamp
        .iter()
        .map(|ts| {
            DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| FetchError::Format { path: "chart response".into(), message: format!("bad timestamp {ts}") })
        })
        .collect::<Result<Vec<NaiveDate>, _>>()?;
    let n = index.len();

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let column = |v: Vec<Option<f64>>| -> ColumnData {
        let mut out: Vec<f64> = v.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect();
        out.resize(n, f64::NAN);
        ColumnData::Numeric(out)
    };

    let mut table = PriceTable::new(index);
    table.push_column(ColumnLabel::flat("Open"), column(quote.open))?;
    table.push_column(ColumnLabel::flat("High"), column(quote.high))?;
    table.push_column(ColumnLabel::flat("Low"), column(quote.low))?;
    table.push_column(ColumnLabel::flat("Close"), column(quote.close))?;
    if let Some(adj) = data.indicators.adjclose.and_then(|a| a.into_iter().next()) {
        table.push_column(ColumnLabel::flat("Adj Close"), column(adj.adjclose))?;
    }
    table.push_column(ColumnLabel::flat("Volume"), column(quote.volume))?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn build_url_uses_midnight_timestamps() {
        let src = YahooSource::with_base_url("http://localhost:9/chart/");
        let url = src.build_url("BRK.B", d(2024, 1, 1), d(2024, 12, 1));
        assert_eq!(url, "http://localhost:9/chart/BRK.B?period1=1704067200&period2=1733011200&interval=1d");
    }

    #[test]
    fn parse_valid_response() {
        let json = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"timestamp":[1704205800,1704292200,1704378600],"indicators":{"quote":[{"open":[185.0,186.0,187.0],"high":[186.0,187.0,188.0],"low":[184.0,185.0,186.0],"close":[185.5,186.5,187.5],"volume":[1000000,1100000,1200000]}],"adjclose":[{"adjclose":[185.4,186.4,187.4]}]}}],"error":null}}"#;
        let t = parse_response(json).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.index()[0], d(2024, 1, 2));
        let labels: Vec<String> = t.columns().iter().map(|c| c.label.to_string()).collect();
        assert_eq!(labels, vec!["Open", "High", "Low", "Close", "Adj Close", "Volume"]);
        assert_eq!(t.numeric_field("Close", None).unwrap()[0], 185.5);
        assert_eq!(t.numeric_field("Volume", None).unwrap()[2], 1_200_000.0);
    }

    #[test]
    fn nulls_become_gaps() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200],"indicators":{"quote":[{"open":[1.0,null],"high":[1.0,null],"low":[1.0,null],"close":[1.0,null],"volume":[10,null]}]}}],"error":null}}"#;
        let t = parse_response(json).unwrap();
        assert_eq!(t.len(), 2);
        assert!(t.numeric_field("Close", None).unwrap()[1].is_nan());
        assert!(t.column(&ColumnLabel::flat("Adj Close")).is_none());
    }

    #[test]
    fn not_found_is_empty() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse_response(json).unwrap().is_empty());
        assert!(parse_response(r#"{"chart":{"result":[],"error":null}}"#).unwrap().is_empty());
    }

    #[test]
    fn other_api_errors_propagate() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        assert!(matches!(parse_response(json), Err(FetchError::Api { .. })));
        assert!(matches!(parse_response("not json"), Err(FetchError::Parse(_))));
    }

    #[test]
    fn inverted_range_is_rejected_before_any_request() {
        let src = YahooSource::with_base_url("http://127.0.0.1:9");
        let err = src.fetch("AAPL", d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, FetchError::InvalidRange { .. }));
    }
}
