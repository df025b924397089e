// File: crates/dash-app/src/lib.rs
// Summary: Dashboard shell library; request model, settings, run orchestration and HTML page.

pub mod config;
pub mod request;
pub mod run;
pub mod page;

pub use config::{Cli, Settings};
pub use request::{DashboardRequest, DatePreset, DateRange, Mode, RequestError};
pub use run::{analyse, fetch_all, run, summary, write_artifacts, Analysis, Report, TickerData, TickerResult, Written};
