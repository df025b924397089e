// File: crates/dash-app/src/request.rs
// Summary: Immutable dashboard request (mode, tickers, date range, window) and the input rules behind it.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, Days, NaiveDate};
use clap::ValueEnum;
use dash_core::ChartRequest;
use thiserror::Error;

pub const WINDOW_RANGE: RangeInclusive<usize> = 5..=100;
pub const DEFAULT_WINDOW: usize = 30;

/// Display name and symbol of the companies offered by `--company`.
pub const POPULAR_COMPANIES: [(&str, &str); 8] = [
    ("Apple Inc.", "AAPL"),
    ("Microsoft Corp.", "MSFT"),
    ("Google (Alphabet)", "GOOGL"),
    ("Amazon", "AMZN"),
    ("Tesla", "TSLA"),
    ("NVIDIA", "NVDA"),
    ("Meta (Facebook)", "META"),
    ("Netflix", "NFLX"),
];

pub const DEFAULT_SINGLE: &[&str] = &["AAPL"];
pub const DEFAULT_MULTI: &[&str] = &["AAPL", "MSFT", "GOOGL"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("no ticker symbols given")]
    NoTickers,
    #[error("unknown company '{0}'; choose one of the popular companies or pass a ticker")]
    UnknownCompany(String),
    #[error("start date {start} must not be after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("moving average window {0} is outside 5..=100")]
    WindowOutOfRange(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Detailed analysis of one ticker.
    Single,
    /// Side-by-side comparison of several tickers.
    Multi,
}

impl Mode {
    pub fn title(self) -> &'static str {
        match self {
            Mode::Single => "Single Stock Analysis",
            Mode::Multi => "Multi-Stock Comparison",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DatePreset {
    #[value(name = "1M")]
    OneMonth,
    #[value(name = "3M")]
    ThreeMonths,
    #[value(name = "6M")]
    SixMonths,
    #[value(name = "1Y")]
    OneYear,
    #[value(name = "2Y")]
    TwoYears,
    #[value(name = "YTD")]
    YearToDate,
    #[value(name = "5Y")]
    FiveYears,
}

impl DatePreset {
    /// Range ending today.
    pub fn range(self, today: NaiveDate) -> DateRange {
        let back = |days: u64| today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        let start = match self {
            DatePreset::OneMonth => back(30),
            DatePreset::ThreeMonths => back(90),
            DatePreset::SixMonths => back(180),
            DatePreset::OneYear => back(365),
            DatePreset::TwoYears => back(730),
            DatePreset::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            DatePreset::FiveYears => back(1825),
        };
        DateRange { start, end: today }
    }
}

/// `[start, end)` in trading-calendar terms; `start <= end` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RequestError> {
        if start > end {
            return Err(RequestError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Ticker for a popular company name, matched case-insensitively.
pub fn company_ticker(name: &str) -> Option<&'static str> {
    let name = name.trim();
    POPULAR_COMPANIES.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, t)| *t)
}

/// Split comma-separated symbols: trimmed, uppercased, blanks dropped.
pub fn parse_tickers(input: &str) -> Vec<String> {
    input.split(',').map(|t| t.trim().to_uppercase()).filter(|t| !t.is_empty()).collect()
}

/// Drop repeated symbols, keeping the first occurrence.
pub fn dedupe(tickers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tickers.len());
    for t in tickers {
        if !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

pub fn check_window(window: usize) -> Result<usize, RequestError> {
    if WINDOW_RANGE.contains(&window) {
        Ok(window)
    } else {
        Err(RequestError::WindowOutOfRange(window))
    }
}

/// Everything one run needs. Built once from the command line and passed by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardRequest {
    mode: Mode,
    tickers: Vec<String>,
    range: DateRange,
    window: usize,
    show_volume: bool,
}

impl DashboardRequest {
    pub fn new(mode: Mode, tickers: Vec<String>, range: DateRange, window: usize, show_volume: bool) -> Result<Self, RequestError> {
        let tickers = dedupe(tickers.into_iter().map(|t| t.trim().to_uppercase()).filter(|t| !t.is_empty()).collect());
        if tickers.is_empty() {
            return Err(RequestError::NoTickers);
        }
        let window = check_window(window)?;
        Ok(Self { mode, tickers, range, window, show_volume })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Every requested symbol, in input order.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Symbols that are fetched and analysed; single mode only looks at the first.
    pub fn analysed(&self) -> &[String] {
        match self.mode {
            Mode::Single => &self.tickers[..1],
            Mode::Multi => &self.tickers,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn show_volume(&self) -> bool {
        self.show_volume
    }

    pub fn chart_request(&self) -> ChartRequest {
        ChartRequest { window: self.window, show_volume: self.show_volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn presets_count_back_from_today() {
        let today = d(2024, 3, 15);
        assert_eq!(DatePreset::OneMonth.range(today).start(), d(2024, 2, 14));
        assert_eq!(DatePreset::YearToDate.range(today).start(), d(2024, 1, 1));
        assert_eq!(DatePreset::FiveYears.range(today).start(), d(2019, 3, 17));
        assert_eq!(DatePreset::OneYear.range(today).end(), today);
    }

    #[test]
    fn single_mode_analyses_first_ticker_only() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 2, 1)).unwrap();
        let req = DashboardRequest::new(Mode::Single, vec!["msft".into(), "AAPL".into()], range, 30, true).unwrap();
        assert_eq!(req.analysed(), &["MSFT".to_string()]);
        assert_eq!(req.tickers().len(), 2);
    }
}
