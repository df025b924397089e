// File: crates/dash-app/src/config.rs
// Summary: Command line (clap) and environment settings for the `tickerdash` binary.
// Notes:
// - Flags win over environment variables; a `.env` file in the working directory is
//   read first when present.

use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use dash_render_skia::{theme, Theme};
use tracing::warn;

use crate::request::{
    check_window, company_ticker, dedupe, parse_tickers, DashboardRequest, DatePreset, DateRange, Mode, RequestError,
    DEFAULT_MULTI, DEFAULT_SINGLE, DEFAULT_WINDOW,
};

pub const DEFAULT_START: (i32, u32, u32) = (2023, 1, 1);

#[derive(Debug, Clone, Parser)]
#[command(name = "tickerdash", about = "Stock price dashboard: metrics, charts and CSV exports for one or more tickers")]
pub struct Cli {
    /// Analysis mode.
    #[arg(long, value_enum, default_value_t = Mode::Single)]
    pub mode: Mode,

    /// Ticker symbol (repeatable).
    #[arg(long = "ticker", value_name = "SYMBOL")]
    pub ticker: Vec<String>,

    /// Comma-separated ticker symbols, e.g. "TSLA, NVDA".
    #[arg(long, value_name = "LIST")]
    pub tickers: Option<String>,

    /// Popular company by name, e.g. "Apple Inc." (repeatable).
    #[arg(long = "company", value_name = "NAME")]
    pub company: Vec<String>,

    /// Quick date range ending today; overrides --start/--end.
    #[arg(long, value_enum)]
    pub preset: Option<DatePreset>,

    /// First day (YYYY-MM-DD), default 2023-01-01.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Day after the last one fetched (YYYY-MM-DD), default today.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Moving average window in days (5-100).
    #[arg(long, default_value_t = DEFAULT_WINDOW, value_parser = parse_window)]
    pub window: usize,

    /// Leave the volume bars off the price chart.
    #[arg(long)]
    pub no_volume: bool,

    /// Output directory [env: TICKERDASH_OUT_DIR, default ./dashboard]
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Read `{TICKER}.csv` files from this directory instead of Yahoo Finance [env: TICKERDASH_DATA_DIR]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Chart theme: light, dark, solarized-light [env: TICKERDASH_THEME]
    #[arg(long)]
    pub theme: Option<String>,

    /// Skip PNG output (SVG, CSV and HTML are still written).
    #[arg(long)]
    pub no_png: bool,
}

fn parse_window(s: &str) -> Result<usize, String> {
    let n: usize = s.trim().parse().map_err(|_| format!("'{s}' is not a whole number"))?;
    check_window(n).map_err(|e| e.to_string())
}

impl Cli {
    /// Symbols from `--company`, `--ticker` and `--tickers`, in that order, or the mode's defaults.
    pub fn symbols(&self) -> Result<Vec<String>, RequestError> {
        let mut out = Vec::new();
        for name in &self.company {
            let t = company_ticker(name).ok_or_else(|| RequestError::UnknownCompany(name.clone()))?;
            out.push(t.to_string());
        }
        for t in &self.ticker {
            out.extend(parse_tickers(t));
        }
        if let Some(list) = &self.tickers {
            out.extend(parse_tickers(list));
        }
        if out.is_empty() {
            let defaults = match self.mode {
                Mode::Single => DEFAULT_SINGLE,
                Mode::Multi => DEFAULT_MULTI,
            };
            out = defaults.iter().map(|t| t.to_string()).collect();
        }
        Ok(dedupe(out))
    }

    pub fn date_range(&self, today: NaiveDate) -> Result<DateRange, RequestError> {
        if let Some(preset) = self.preset {
            return Ok(preset.range(today));
        }
        let (y, m, d) = DEFAULT_START;
        let start = self.start.or_else(|| NaiveDate::from_ymd_opt(y, m, d)).unwrap_or(today);
        DateRange::new(start, self.end.unwrap_or(today))
    }

    pub fn to_request(&self, today: NaiveDate) -> Result<DashboardRequest, RequestError> {
        DashboardRequest::new(self.mode, self.symbols()?, self.date_range(today)?, self.window, !self.no_volume)
    }
}

/// Where data comes from and where output goes, after merging flags with the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub out_dir: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub yahoo_url: String,
    pub theme: Theme,
    pub png: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Self {
        let out_dir = cli.out_dir.clone().unwrap_or_else(|| env_path("TICKERDASH_OUT_DIR", "dashboard"));
        let data_dir = cli.data_dir.clone().or_else(|| env_opt("TICKERDASH_DATA_DIR").map(PathBuf::from));
        let yahoo_url = env_str("TICKERDASH_YAHOO_URL", dash_fetch::yahoo::DEFAULT_BASE_URL);
        let theme_name = cli.theme.clone().unwrap_or_else(|| env_str("TICKERDASH_THEME", "light"));
        let theme = theme::find(&theme_name).unwrap_or_else(|| {
            warn!(theme = %theme_name, "unknown theme, using light");
            Theme::light()
        });
        Self { out_dir, data_dir, yahoo_url, theme, png: !cli.no_png }
    }
}

/// Load `.env` when present; a missing file is not an error.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_str(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_path(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env_str(name, default))
}
