// File: crates/dash-render-skia/tests/svg.rs
// Purpose: SVG output carries titles, traces, legend and hover text.

use chrono::NaiveDate;
use dash_core::{comparison_chart, price_chart, ChartRequest, CloseSeries, ColumnData, ColumnLabel, PriceTable, RawData};
use dash_render_skia::{render_svg, RenderOptions};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn table(close: &[f64]) -> PriceTable {
    let dates: Vec<NaiveDate> = (1..=close.len() as u32).map(d).collect();
    let volume: Vec<f64> = close.iter().map(|c| c * 1000.0).collect();
    PriceTable::new(dates)
        .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(close.to_vec()))
        .unwrap()
        .with_column(ColumnLabel::flat("Volume"), ColumnData::Numeric(volume))
        .unwrap()
}

#[test]
fn price_svg_contains_every_trace() {
    let t = table(&[10.0, 11.0, 12.5, 12.0, 13.0]);
    let close = CloseSeries::from_points(t.index(), &[10.0, 11.0, 12.5, 12.0, 13.0]);
    let req = ChartRequest { window: 2, show_volume: true };
    let outcome = price_chart("AAPL", Some(&close), Some(&t), &req);
    let spec = outcome.spec().unwrap();
    let svg = render_svg(spec, &RenderOptions::for_spec(spec));

    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains("AAPL Stock Analysis"));
    assert!(svg.contains("Price (USD)"));
    assert!(svg.contains("2-Day Moving Average"));
    assert!(svg.contains("stroke-dasharray=\"8 5\""));
    assert!(svg.contains("stroke=\"#1f77b4\""));
    assert_eq!(svg.matches("<polyline").count(), 2);
    assert!(svg.contains("class=\"bars\""));
    // Unified hover lists the close on a given date.
    assert!(svg.contains("2024-01-03&#10;Close Price: $12.50"));
}

#[test]
fn comparison_svg_uses_percent_hover() {
    let a = RawData::Table(table(&[100.0, 110.0]));
    let b = RawData::Table(table(&[50.0, 40.0]));
    let chart = comparison_chart(&[("AAA", Some(&a)), ("B&B", Some(&b))]);
    let svg = render_svg(&chart.spec, &RenderOptions::default());

    assert!(svg.contains("Stock Performance Comparison - Normalized Returns (%)"));
    assert!(svg.contains("B&amp;B"));
    assert!(svg.contains("B&amp;B: -20.00%"));
    assert!(svg.contains("stroke=\"#ff7f0e\""));
}
