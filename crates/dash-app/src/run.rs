// File: crates/dash-app/src/run.rs
// Summary: One dashboard run: fetch each ticker, sort out what is unusable, compute the
//          single or multi analysis, then write charts, CSV and the HTML page.
// Notes:
// - Every ticker is fetched on its own; a failure is recorded and the rest carry on.
// - `analyse` is pure. All file output happens in `write_artifacts`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dash_core::format::{money, pct, signed_pct};
use dash_core::{
    comparison_chart, comparison_file_name, comparison_rows, comparison_to_csv, compute_snapshot, price_chart,
    resolve_close, single_file_name, table_to_csv, ChartOutcome, ChartSpec, ComparisonChart, ComparisonRow,
    ExportError, MetricsSnapshot, PriceTable, RawData, ResolveOptions,
};
use dash_fetch::PriceSource;
use dash_render_skia::{render_png, render_svg, RenderOptions};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::page;
use crate::request::{DashboardRequest, Mode};

pub const PAGE_FILE: &str = "dashboard.html";
/// Rows shown when a ticker's data has no usable Close column.
pub const PREVIEW_ROWS: usize = 5;

/// A fetch that raised an error: the one-line message and the full cause chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub message: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickerData {
    Loaded(RawData),
    Failed(FetchFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerResult {
    pub ticker: String,
    pub data: TickerData,
}

impl TickerResult {
    /// Fetched data, empty or not; `None` when the fetch failed.
    pub fn raw(&self) -> Option<&RawData> {
        match &self.data {
            TickerData::Loaded(raw) => Some(raw),
            TickerData::Failed(_) => None,
        }
    }
}

/// Fetch the analysed tickers one after another.
pub fn fetch_all(source: &dyn PriceSource, req: &DashboardRequest) -> Vec<TickerResult> {
    let range = req.range();
    req.analysed()
        .iter()
        .map(|ticker| {
            info!(ticker = %ticker, source = source.name(), %range, "fetching");
            let data = match source.fetch(ticker, range.start(), range.end()) {
                Ok(raw) => TickerData::Loaded(raw),
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "fetch failed");
                    let message = e.to_string();
                    let detail = format!("{:?}", anyhow::Error::new(e).context(format!("fetching {ticker} from {}", source.name())));
                    TickerData::Failed(FetchFailure { message, detail })
                }
            };
            TickerResult { ticker: ticker.clone(), data }
        })
        .collect()
}

/// Tickers that cannot be analysed, by cause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Warnings {
    pub failed: Vec<(String, FetchFailure)>,
    /// Fetched fine but nothing came back.
    pub missing_raw: Vec<String>,
    /// Data came back without a usable Close column; first rows kept for display.
    pub missing_close: Vec<(String, Option<PriceTable>)>,
}

impl Warnings {
    pub fn is_empty(&self) -> bool {
        self.failed.is_empty() && self.missing_raw.is_empty() && self.missing_close.is_empty()
    }
}

pub fn classify(results: &[TickerResult]) -> Warnings {
    let mut w = Warnings::default();
    for r in results {
        match &r.data {
            TickerData::Failed(f) => w.failed.push((r.ticker.clone(), f.clone())),
            TickerData::Loaded(raw) if raw.is_empty() => w.missing_raw.push(r.ticker.clone()),
            TickerData::Loaded(raw) => {
                let lookup = resolve_close(Some(raw), &ResolveOptions::for_ticker(r.ticker.as_str()));
                if !lookup.is_found() {
                    debug!(ticker = %r.ticker, reason = ?lookup.not_found_reason(), "no close column");
                    w.missing_close.push((r.ticker.clone(), raw.as_table().map(|t| t.head(PREVIEW_ROWS))));
                }
            }
        }
    }
    w
}

/// A file to offer for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleAnalysis {
    pub ticker: String,
    /// `None` when no close series resolved.
    pub snapshot: Option<MetricsSnapshot>,
    pub chart: ChartOutcome,
    pub export: Option<Export>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiAnalysis {
    pub rows: Vec<ComparisonRow>,
    pub chart: ComparisonChart,
    pub export: Option<Export>,
}

impl MultiAnalysis {
    pub fn has_data(&self) -> bool {
        self.rows.iter().any(ComparisonRow::has_data)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Single(SingleAnalysis),
    Multi(MultiAnalysis),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub request: DashboardRequest,
    pub source: String,
    pub results: Vec<TickerResult>,
    pub warnings: Warnings,
    /// `None` when not a single ticker returned any data.
    pub analysis: Option<Analysis>,
}

impl Report {
    /// Tickers that failed or came back empty.
    pub fn unloaded(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.raw().is_some_and(|raw| !raw.is_empty()))
            .map(|r| r.ticker.as_str())
            .collect()
    }
}

pub fn analyse(request: &DashboardRequest, source: &str, results: Vec<TickerResult>) -> Result<Report, ExportError> {
    let warnings = classify(&results);
    let any_data = results.iter().any(|r| r.raw().is_some_and(|raw| !raw.is_empty()));
    let analysis = if !any_data {
        None
    } else {
        Some(match request.mode() {
            Mode::Single => Analysis::Single(single(request, &results[0])?),
            Mode::Multi => Analysis::Multi(multi(&results)?),
        })
    };
    Ok(Report { request: request.clone(), source: source.to_string(), results, warnings, analysis })
}

fn single(request: &DashboardRequest, result: &TickerResult) -> Result<SingleAnalysis, ExportError> {
    let ticker = result.ticker.as_str();
    let raw = result.raw();
    let close = resolve_close(raw, &ResolveOptions::for_ticker(ticker)).into_series();
    let table = raw.and_then(|r| r.table_for(ticker));
    let snapshot = close.as_ref().and_then(|c| compute_snapshot(c, table.as_ref()).ok());
    let chart = price_chart(ticker, close.as_ref(), table.as_ref(), &request.chart_request());
    let export = match raw.and_then(RawData::as_table).filter(|t| !t.is_empty()) {
        Some(t) => Some(Export { file_name: single_file_name(ticker), contents: table_to_csv(t)? }),
        None => None,
    };
    Ok(SingleAnalysis { ticker: ticker.to_string(), snapshot, chart, export })
}

fn multi(results: &[TickerResult]) -> Result<MultiAnalysis, ExportError> {
    let entries: Vec<(&str, Option<&RawData>)> = results.iter().map(|r| (r.ticker.as_str(), r.raw())).collect();
    let rows = comparison_rows(&entries);
    let chart = comparison_chart(&entries);

    let loaded: Vec<(&str, Option<&RawData>)> = entries.iter().copied().filter(|(_, raw)| raw.is_some()).collect();
    let export = if rows.iter().any(ComparisonRow::has_data) {
        let names: Vec<&str> = loaded.iter().map(|(t, _)| *t).collect();
        Some(Export { file_name: comparison_file_name(&names), contents: comparison_to_csv(&loaded)? })
    } else {
        None
    };
    Ok(MultiAnalysis { rows, chart, export })
}

/// A chart written to disk: its SVG (also embedded in the page) and optional PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub svg: String,
    pub svg_file: String,
    pub png_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Written {
    pub page: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Render charts, write exports and the page into `settings.out_dir`.
pub fn write_artifacts(report: &Report, settings: &Settings) -> Result<Written> {
    let dir = settings.out_dir.as_path();
    fs::create_dir_all(dir).with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    let mut written = Written::default();

    let (spec, stem, export) = match &report.analysis {
        Some(Analysis::Single(s)) => (s.chart.spec(), format!("{}_price", s.ticker), s.export.as_ref()),
        Some(Analysis::Multi(m)) => ((!m.chart.is_empty()).then_some(&m.chart.spec), "comparison".to_string(), m.export.as_ref()),
        None => (None, String::new(), None),
    };

    let chart = match spec {
        Some(spec) => Some(write_chart(spec, &stem, dir, settings, &mut written.files)?),
        None => None,
    };

    if let Some(export) = export {
        let path = dir.join(&export.file_name);
        fs::write(&path, &export.contents).with_context(|| format!("failed to write '{}'", path.display()))?;
        written.files.push(path);
    }

    let html = page::render(report, chart.as_ref());
    let path = dir.join(PAGE_FILE);
    fs::write(&path, html).with_context(|| format!("failed to write '{}'", path.display()))?;
    info!(path = %path.display(), "dashboard written");
    written.files.push(path.clone());
    written.page = path;
    Ok(written)
}

fn write_chart(spec: &ChartSpec, stem: &str, dir: &Path, settings: &Settings, files: &mut Vec<PathBuf>) -> Result<RenderedChart> {
    let opts = RenderOptions::for_spec(spec).with_theme(settings.theme);

    let svg = render_svg(spec, &opts);
    let svg_file = format!("{stem}.svg");
    let svg_path = dir.join(&svg_file);
    fs::write(&svg_path, &svg).with_context(|| format!("failed to write '{}'", svg_path.display()))?;
    files.push(svg_path);

    let png_file = if settings.png {
        let name = format!("{stem}.png");
        let path = dir.join(&name);
        render_png(spec, &opts, &path).with_context(|| format!("failed to render '{}'", spec.title))?;
        files.push(path);
        Some(name)
    } else {
        None
    };
    Ok(RenderedChart { svg, svg_file, png_file })
}

/// Fetch, analyse and write in one go.
pub fn run(request: &DashboardRequest, source: &dyn PriceSource, settings: &Settings) -> Result<(Report, Written)> {
    let results = fetch_all(source, request);
    let report = analyse(request, source.name(), results).context("failed to prepare CSV export")?;
    let written = write_artifacts(&report, settings)?;
    Ok((report, written))
}

/// Short plain-text account of a run for the terminal.
pub fn summary(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {} | {} | {}-day moving average",
        report.request.mode().title(),
        report.request.analysed().join(", "),
        report.request.range(),
        report.request.window()
    );
    for r in &report.results {
        let line = match &r.data {
            TickerData::Failed(f) => format!("error: {}", f.message),
            TickerData::Loaded(raw) if raw.is_empty() => "no data".to_string(),
            TickerData::Loaded(raw) => {
                let close = resolve_close(Some(raw), &ResolveOptions::for_ticker(r.ticker.as_str())).into_series();
                let table = raw.table_for(&r.ticker);
                match close.as_ref().and_then(|c| compute_snapshot(c, table.as_ref()).ok()) {
                    Some(m) => format!(
                        "{} rows, last {}, total return {}, volatility {}",
                        raw.len(),
                        money(m.current),
                        m.total_return_pct.map_or("N/A".to_string(), signed_pct),
                        m.volatility_pct.map_or("N/A".to_string(), pct)
                    ),
                    None => format!("{} rows, no Close prices", raw.len()),
                }
            }
        };
        let _ = writeln!(out, "  {}: {line}", r.ticker);
    }
    out
}
