// File: crates/dash-app/src/page.rs
// Summary: Self-contained HTML dashboard: banners, metric cards, embedded SVG charts,
//          comparison table, per-ticker details and download links.

use std::fmt::Write as _;

use dash_core::format::{count, escape, money, pct, signed_pct};
use dash_core::{ChartOutcome, ComparisonRow, MetricsSnapshot, PriceTable, Sourced};

use crate::run::{Analysis, MultiAnalysis, RenderedChart, Report, SingleAnalysis, Warnings};

const TEMPLATE: &str = include_str!("../templates/dashboard.html");
const TITLE: &str = "📊 Financial Data Dashboard";
const SUBTITLE: &str = "Analyze stock performance with interactive charts and key metrics";

pub fn render(report: &Report, chart: Option<&RenderedChart>) -> String {
    let content = match &report.analysis {
        Some(Analysis::Single(s)) => single(s, chart),
        Some(Analysis::Multi(m)) => multi(m, chart),
        None => String::new(),
    };
    let footer = if report.source == "yahoo" {
        "💡 Data provided by Yahoo Finance".to_string()
    } else {
        format!("💡 Data source: {}", escape(&report.source))
    };
    TEMPLATE
        .replace("{{title}}", TITLE)
        .replace("{{subtitle}}", SUBTITLE)
        .replace("{{request}}", &request_line(report))
        .replace("{{banners}}", &banners(report))
        .replace("{{footer}}", &footer)
        .replace("{{version}}", env!("CARGO_PKG_VERSION"))
        .replace("{{content}}", &content)
}

fn request_line(report: &Report) -> String {
    let req = &report.request;
    format!(
        "<strong>{}</strong> &middot; Tickers: {} &middot; {} &middot; {}-Day Moving Average &middot; Volume {}",
        req.mode().title(),
        escape(&req.analysed().join(", ")),
        req.range(),
        req.window(),
        if req.show_volume() { "shown" } else { "hidden" }
    )
}

fn banner(kind: &str, html: &str) -> String {
    format!("<div class=\"banner {kind}\">{html}</div>\n")
}

fn banners(report: &Report) -> String {
    let Warnings { failed, missing_raw, missing_close } = &report.warnings;
    let mut out = String::new();
    for (ticker, f) in failed {
        out.push_str(&banner("error", &format!("❌ Error fetching data for {}: {}", escape(ticker), escape(&f.message))));
        let _ = writeln!(out, "<details><summary>Show error details</summary><pre>{}</pre></details>", escape(&f.detail));
    }
    if report.analysis.is_none() {
        let names = report.unloaded().join(", ");
        out.push_str(&banner(
            "error",
            &format!("❌ No data found for: {}. Please check the ticker symbols and try again.", escape(&names)),
        ));
    }
    if !missing_raw.is_empty() {
        out.push_str(&banner("warning", &format!("No raw data fetched for: {}", escape(&missing_raw.join(", ")))));
    }
    if !missing_close.is_empty() {
        let names: Vec<&str> = missing_close.iter().map(|(t, _)| t.as_str()).collect();
        out.push_str(&banner("warning", &format!("Fetched data missing Close prices for: {}", escape(&names.join(", ")))));
        for (ticker, preview) in missing_close {
            let _ = writeln!(out, "<p class=\"caption\">Preview of raw data for {} (first 5 rows):</p>", escape(ticker));
            match preview {
                Some(t) => out.push_str(&table_html(t)),
                None => out.push_str("<pre>(not a table)</pre>\n"),
            }
        }
    }
    out
}

fn table_html(t: &PriceTable) -> String {
    let mut out = String::from("<table><thead><tr><th>Date</th>");
    for c in t.columns() {
        let _ = write!(out, "<th>{}</th>", escape(&c.label.to_string()));
    }
    out.push_str("</tr></thead><tbody>");
    for (row, date) in t.index().iter().enumerate() {
        let _ = write!(out, "<tr><td>{date}</td>");
        for c in t.columns() {
            let _ = write!(out, "<td>{}</td>", escape(&c.data.cell_text(row)));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>\n");
    out
}

fn card(label: &str, value: &str, delta: Option<(String, bool)>, note: Option<&str>) -> String {
    let mut out = format!(
        "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div>",
        escape(label),
        escape(value)
    );
    if let Some((text, up)) = delta {
        let _ = write!(out, "<div class=\"delta {}\">{}</div>", if up { "up" } else { "down" }, escape(&text));
    }
    if let Some(note) = note {
        let _ = write!(out, "<div class=\"note\">{}</div>", escape(note));
    }
    out.push_str("</div>");
    out
}

fn signed_money(v: f64) -> String {
    if v >= 0.0 {
        format!("+{}", money(v))
    } else {
        money(v)
    }
}

fn or_na(v: Option<f64>, f: fn(f64) -> String) -> String {
    v.map_or_else(|| "N/A".to_string(), f)
}

/// Column value, or N/A when it only exists as a fallback.
fn column_money(v: &Sourced<f64>) -> String {
    if v.is_fallback() {
        "N/A".to_string()
    } else {
        money(v.value)
    }
}

fn chart_html(chart: &RenderedChart) -> String {
    let mut out = format!("<figure class=\"chart\">{}</figure>\n<p>", chart.svg);
    if let Some(png) = &chart.png_file {
        let _ = write!(out, "<a href=\"{}\">PNG</a> &middot; ", escape(png));
    }
    let _ = writeln!(out, "<a href=\"{}\">SVG</a></p>", escape(&chart.svg_file));
    out
}

fn download(label: &str, file: &str) -> String {
    format!("<a class=\"download\" href=\"{0}\" download=\"{0}\">📥 {1}</a>\n", escape(file), escape(label))
}

fn single(s: &SingleAnalysis, chart: Option<&RenderedChart>) -> String {
    let mut out = String::from("<h2>📊 Key Metrics</h2>\n");
    match &s.snapshot {
        Some(m) => out.push_str(&metric_cards(&s.ticker, m)),
        None => out.push_str(&banner("info", "Not enough data for metrics.")),
    }
    out.push_str("<hr>\n<h2>📈 Price Chart &amp; Analysis</h2>\n");
    match (&s.chart, chart) {
        (ChartOutcome::Ready(_), Some(c)) => out.push_str(&chart_html(c)),
        (ChartOutcome::Ready(spec), None) => out.push_str(&banner("info", &format!("{} was not rendered.", escape(&spec.title)))),
        (ChartOutcome::Empty { message, .. }, _) => out.push_str(&banner("warning", &escape(message))),
    }
    if let Some(m) = &s.snapshot {
        out.push_str(&insights(m));
    }
    if let Some(e) = &s.export {
        out.push_str(&download("Download Data as CSV", &e.file_name));
    }
    out
}

fn metric_cards(ticker: &str, m: &MetricsSnapshot) -> String {
    let mut out = String::from("<div class=\"cards\">");
    out.push_str(&card(
        &format!("{ticker} Current Price"),
        &money(m.current),
        Some((format!("{} ({})", signed_money(m.change), signed_pct(m.change_pct)), m.change >= 0.0)),
        None,
    ));
    out.push_str(&card("Total Return", &or_na(m.total_return_pct, pct), None, None));
    out.push_str(&card("Volatility", &or_na(m.volatility_pct, pct), None, None));
    out.push_str(&card(
        "Average Volume",
        &count(m.avg_volume.value),
        None,
        m.avg_volume.is_fallback().then_some("no Volume data"),
    ));
    out.push_str(&card("Period High", &money(m.high.value), None, m.high.is_fallback().then_some("from Close")));
    out.push_str(&card("Period Low", &money(m.low.value), None, m.low.is_fallback().then_some("from Close")));
    out.push_str("</div>\n");
    out
}

fn insights(m: &MetricsSnapshot) -> String {
    let s = &m.stats;
    let total = or_na(s.total_volume, count);
    let average = if m.avg_volume.is_fallback() { "N/A".to_string() } else { count(m.avg_volume.value) };
    let busiest = s.max_volume.map_or_else(|| "N/A".to_string(), |(d, v)| format!("{} on {d}", count(v)));
    format!(
        "<details><summary>📋 Additional Insights</summary><div class=\"columns\">\
         <div><p><strong>📈 Price Statistics:</strong></p><ul>\
         <li>Highest Price: {}</li><li>Lowest Price: {}</li><li>Average Price: {}</li><li>Price Volatility: {}</li></ul></div>\
         <div><p><strong>📊 Trading Statistics:</strong></p><ul>\
         <li>Total Volume: {}</li><li>Average Daily Volume: {}</li><li>Highest Volume Day: {}</li><li>Trading Days: {}</li></ul></div>\
         </div></details>\n",
        column_money(&m.high),
        column_money(&m.low),
        money(s.avg_price),
        or_na(s.price_std, |v| format!("{v:.2}")),
        total,
        average,
        busiest,
        s.trading_days
    )
}

fn multi(m: &MultiAnalysis, chart: Option<&RenderedChart>) -> String {
    let mut out = String::from("<h2>📊 Stock Comparison Metrics</h2>\n");
    if m.has_data() {
        out.push_str(&comparison_table(&m.rows));
    } else {
        out.push_str(&banner("info", "No valid data to compare."));
    }

    out.push_str("<hr>\n<h2>📈 Performance Comparison</h2>\n");
    match chart {
        Some(c) if !m.chart.is_empty() => out.push_str(&chart_html(c)),
        _ => out.push_str(&banner("info", "No valid data to plot.")),
    }
    if !m.chart.skipped.is_empty() {
        let list: Vec<String> =
            m.chart.skipped.iter().map(|s| format!("{} ({})", escape(&s.ticker), s.reason.describe())).collect();
        out.push_str(&banner("warning", &format!("Skipped tickers: {}", list.join(", "))));
    }

    out.push_str("<h2>📋 Individual Stock Details</h2>\n");
    for row in &m.rows {
        out.push_str(&ticker_details(row));
    }
    if let Some(e) = &m.export {
        out.push_str(&download("Download Comparison Data", &e.file_name));
    }
    out
}

fn comparison_table(rows: &[ComparisonRow]) -> String {
    let mut out = String::from(
        "<table><thead><tr><th>Ticker</th><th>Current Price</th><th>Total Return</th><th>Volatility</th>\
         <th>Avg Volume</th><th>High</th><th>Low</th></tr></thead><tbody>",
    );
    for row in rows {
        let ticker = escape(&row.ticker);
        match &row.snapshot {
            Some(s) => {
                let _ = write!(
                    out,
                    "<tr><td>{ticker}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    money(s.current),
                    or_na(s.total_return_pct, pct),
                    or_na(s.volatility_pct, pct),
                    count(s.avg_volume.value),
                    money(s.high.value),
                    money(s.low.value)
                );
            }
            None => {
                let _ = write!(out, "<tr><td>{ticker}</td><td colspan=\"6\">No price data for {ticker}.</td></tr>");
            }
        }
    }
    out.push_str("</tbody></table>\n");
    out
}

fn ticker_details(row: &ComparisonRow) -> String {
    let mut out = format!("<section><h3>📈 {}</h3>\n", escape(&row.ticker));
    let Some(s) = &row.snapshot else {
        out.push_str(&banner("warning", &format!("No price data for {}.", escape(&row.ticker))));
        out.push_str("</section>\n");
        return out;
    };
    let delta = s.total_return_pct.map(|r| (format!("{} total return", signed_pct(r)), r >= 0.0));
    let _ = write!(
        out,
        "<div class=\"columns\"><div><div class=\"cards\">{}</div></div>\
         <div><p><strong>Key Stats:</strong></p><ul><li>High: {}</li><li>Low: {}</li><li>Avg Volume: {}</li></ul></div></div>\n",
        card(&format!("{} Current Price", row.ticker), &money(s.current), delta, None),
        column_money(&s.high),
        column_money(&s.low),
        count(s.avg_volume.value)
    );
    out.push_str("</section>\n");
    out
}
