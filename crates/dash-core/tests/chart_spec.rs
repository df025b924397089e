// File: crates/dash-core/tests/chart_spec.rs
// Purpose: Price and comparison chart specs: traces, layout and skipped tickers.

use chrono::NaiveDate;
use dash_core::chart::COMPARISON_TITLE;
use dash_core::{
    comparison_chart, price_chart, AxisSide, ChartOutcome, ChartRequest, CloseSeries, ColumnData, ColumnLabel, Dash,
    PriceTable, RawData, Rgba, SkipReason, TraceKind, PALETTE,
};

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    (0..n).map(|i| start + chrono::Days::new(i as u64)).collect()
}

fn table(close: &[f64], volume: Option<&[f64]>) -> PriceTable {
    let mut t = PriceTable::new(dates(close.len()));
    t.push_column(ColumnLabel::flat("Close"), ColumnData::Numeric(close.to_vec())).unwrap();
    if let Some(v) = volume {
        t.push_column(ColumnLabel::flat("Volume"), ColumnData::Numeric(v.to_vec())).unwrap();
    }
    t
}

#[test]
fn price_chart_with_volume() {
    let t = table(&[1.0, 2.0, 3.0, 4.0], Some(&[10.0, 20.0, 30.0, 40.0]));
    let close = CloseSeries::from_points(t.index(), &[1.0, 2.0, 3.0, 4.0]);
    let req = ChartRequest { window: 2, show_volume: true };
    let ChartOutcome::Ready(spec) = price_chart("AAPL", Some(&close), Some(&t), &req) else {
        panic!("expected a chart");
    };

    assert_eq!(spec.title, "AAPL Stock Analysis");
    assert_eq!(spec.x_axis.title, "Date");
    assert_eq!(spec.y_axis.title, "Price (USD)");
    assert_eq!(spec.height, 600);
    assert_eq!(spec.traces.len(), 3);

    let close_trace = &spec.traces[0];
    assert_eq!(close_trace.name, "Close Price");
    assert_eq!(close_trace.color, PALETTE[0]);
    assert_eq!(close_trace.width, 2.0);

    let ma = &spec.traces[1];
    assert_eq!(ma.name, "2-Day Moving Average");
    assert_eq!(ma.dash, Dash::Dashed);
    assert!(ma.y[0].is_nan());
    assert_eq!(&ma.y[1..], &[1.5, 2.5, 3.5]);

    let vol = &spec.traces[2];
    assert_eq!(vol.kind, TraceKind::Bar);
    assert_eq!(vol.side, AxisSide::Right);
    assert_eq!(vol.color, Rgba::rgba(158, 202, 225, 128));
    assert!((vol.opacity - 0.3).abs() < 1e-6);
    let y2 = spec.y2_axis.as_ref().unwrap();
    assert_eq!(y2.title, "Volume");
    assert!(!y2.show_grid);
}

#[test]
fn price_chart_without_volume() {
    let t = table(&[1.0, 2.0], Some(&[5.0, 6.0]));
    let close = CloseSeries::from_points(t.index(), &[1.0, 2.0]);
    let req = ChartRequest { window: 30, show_volume: false };
    let spec = price_chart("MSFT", Some(&close), Some(&t), &req);
    let spec = spec.spec().unwrap();
    assert_eq!(spec.traces.len(), 2);
    assert!(spec.y2_axis.is_none());
    assert_eq!(spec.traces[1].name, "30-Day Moving Average");

    // Volume requested but the table has none.
    let t = table(&[1.0, 2.0], None);
    let spec = price_chart("MSFT", Some(&close), Some(&t), &ChartRequest::default());
    assert_eq!(spec.spec().unwrap().traces.len(), 2);
}

#[test]
fn price_chart_needs_two_points() {
    let close = CloseSeries::from_points(&dates(1), &[1.0]);
    match price_chart("TSLA", Some(&close), None, &ChartRequest::default()) {
        ChartOutcome::Empty { message, .. } => assert_eq!(message, "Not enough price data to plot TSLA."),
        other => panic!("expected empty outcome, got {other:?}"),
    }
    assert!(price_chart("TSLA", None, None, &ChartRequest::default()).spec().is_none());
}

#[test]
fn comparison_skips_unusable_tickers() {
    let good = RawData::Table(table(&[100.0, 110.0, 120.0], None));
    let other = RawData::Table(table(&[50.0, 25.0], None));
    let empty = RawData::Table(PriceTable::empty());
    let no_close = RawData::Table(
        PriceTable::new(dates(2))
            .with_column(ColumnLabel::flat("Open"), ColumnData::Numeric(vec![1.0, 2.0]))
            .unwrap(),
    );
    let single = RawData::Table(table(&[5.0], None));
    let zero = RawData::Table(table(&[0.0, 5.0], None));

    let chart = comparison_chart(&[
        ("AAPL", Some(&good)),
        ("EMPTY", Some(&empty)),
        ("OPEN", Some(&no_close)),
        ("MSFT", Some(&other)),
        ("ONE", Some(&single)),
        ("ZERO", Some(&zero)),
        ("GONE", None),
    ]);

    assert_eq!(chart.spec.title, COMPARISON_TITLE);
    assert_eq!(chart.spec.y_axis.title, "Return (%)");
    let names: Vec<&str> = chart.spec.traces.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["AAPL", "MSFT"]);

    let aapl = &chart.spec.traces[0];
    for (got, want) in aapl.y.iter().zip([0.0, 10.0, 20.0]) {
        assert!((got - want).abs() < 1e-9, "{got} vs {want}");
    }
    assert_eq!(aapl.color, PALETTE[0]);
    // Color follows input position, not plotted position.
    assert_eq!(chart.spec.traces[1].color, PALETTE[3]);
    assert_eq!(chart.spec.traces[1].y, vec![0.0, -50.0]);

    let skipped: Vec<(&str, SkipReason)> = chart.skipped.iter().map(|s| (s.ticker.as_str(), s.reason)).collect();
    assert_eq!(
        skipped,
        vec![
            ("EMPTY", SkipReason::NoData),
            ("OPEN", SkipReason::NoClose),
            ("ONE", SkipReason::TooFewPoints),
            ("ZERO", SkipReason::ZeroStart),
            ("GONE", SkipReason::NoData),
        ]
    );
}

#[test]
fn comparison_with_nothing_plottable_is_empty() {
    let chart = comparison_chart(&[("X", None)]);
    assert!(chart.is_empty());
    assert_eq!(chart.skipped.len(), 1);
}

#[test]
fn comparison_of_newest_first_rows_starts_at_the_oldest_day() {
    let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
    let raw = RawData::Table(
        PriceTable::new(vec![d(5), d(4), d(3)])
            .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(vec![150.0, 120.0, 100.0]))
            .unwrap(),
    );
    let chart = comparison_chart(&[("AAPL", Some(&raw))]);
    let trace = &chart.spec.traces[0];
    assert_eq!(trace.x, vec![d(3), d(4), d(5)]);
    assert_eq!(trace.y.first().copied(), Some(0.0));
    assert!((trace.y[2] - 50.0).abs() < 1e-9);
}
