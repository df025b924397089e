// File: crates/dash-core/tests/metrics.rs
// Purpose: Summary figures, their fallbacks and the comparison rows.

use chrono::NaiveDate;
use dash_core::format::signed_pct;
use dash_core::{
    comparison_rows, comparison_to_csv, compute_snapshot, resolve_close, CloseSeries, ColumnData, ColumnLabel,
    MetricsError, PriceTable, Provenance, RawData, ResolveOptions,
};

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    (0..n).map(|i| start + chrono::Days::new(i as u64)).collect()
}

fn close(values: &[f64]) -> CloseSeries {
    CloseSeries::from_points(&dates(values.len()), values)
}

#[test]
fn total_return_ten_percent() {
    let m = compute_snapshot(&close(&[100.0, 110.0]), None).unwrap();
    let r = m.total_return_pct.unwrap();
    assert!((r - 10.0).abs() < 1e-9);
    assert_eq!(signed_pct(r), "+10.00%");
    assert_eq!(m.current, 110.0);
    assert_eq!(m.prior, 100.0);
    assert!((m.change_pct - 10.0).abs() < 1e-9);
}

#[test]
fn zero_start_gives_zero_return() {
    let m = compute_snapshot(&close(&[0.0, 110.0]), None).unwrap();
    assert_eq!(m.total_return_pct, Some(0.0));
    assert_eq!(m.change_pct, 0.0);
}

#[test]
fn flat_prices_have_zero_volatility() {
    let m = compute_snapshot(&close(&[100.0, 100.0, 100.0]), None).unwrap();
    assert_eq!(m.volatility_pct, Some(0.0));
    assert_eq!(m.stats.price_std, Some(0.0));
}

#[test]
fn volatility_is_sample_std_of_returns() {
    // returns: +10%, -10% -> mean 0, sample std = sqrt((0.01 + 0.01) / 1) = 0.1414..
    let m = compute_snapshot(&close(&[100.0, 110.0, 99.0]), None).unwrap();
    let expected = (0.02f64).sqrt() * 100.0;
    assert!((m.volatility_pct.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn empty_series_is_an_error() {
    let err = compute_snapshot(&close(&[]), None).unwrap_err();
    assert!(matches!(err, MetricsError::NotEnoughData { .. }));
}

#[test]
fn missing_columns_fall_back_to_close() {
    let m = compute_snapshot(&close(&[5.0, 9.0, 7.0]), None).unwrap();
    assert_eq!(m.high.value, 9.0);
    assert_eq!(m.high.source, Provenance::CloseFallback);
    assert_eq!(m.low.value, 5.0);
    assert_eq!(m.low.source, Provenance::CloseFallback);
    assert_eq!(m.avg_volume.value, 0.0);
    assert_eq!(m.avg_volume.source, Provenance::Default);
    assert_eq!(m.stats.total_volume, None);
    assert_eq!(m.stats.max_volume, None);
}

#[test]
fn dedicated_columns_are_used_when_present() {
    let t = PriceTable::new(dates(3))
        .with_column(ColumnLabel::flat("High"), ColumnData::Numeric(vec![6.0, 12.0, 8.0]))
        .unwrap()
        .with_column(ColumnLabel::flat("Low"), ColumnData::Numeric(vec![4.0, 8.0, f64::NAN]))
        .unwrap()
        .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(vec![5.0, 9.0, 7.0]))
        .unwrap()
        .with_column(ColumnLabel::flat("Volume"), ColumnData::Numeric(vec![100.0, 300.0, 200.0]))
        .unwrap();
    let m = compute_snapshot(&close(&[5.0, 9.0, 7.0]), Some(&t)).unwrap();
    assert_eq!((m.high.value, m.high.source), (12.0, Provenance::Column));
    assert_eq!((m.low.value, m.low.source), (4.0, Provenance::Column));
    assert_eq!((m.avg_volume.value, m.avg_volume.source), (200.0, Provenance::Column));
    assert_eq!(m.stats.total_volume, Some(600.0));
    assert_eq!(m.stats.max_volume, Some((dates(3)[1], 300.0)));
    assert_eq!(m.stats.trading_days, 3);
    assert!((m.stats.avg_price - 7.0).abs() < 1e-12);
}

#[test]
fn text_high_column_that_does_not_parse_falls_back() {
    let t = PriceTable::new(dates(2))
        .with_column(ColumnLabel::flat("High"), ColumnData::Text(vec!["x".into(), "y".into()]))
        .unwrap();
    let m = compute_snapshot(&close(&[1.0, 3.0]), Some(&t)).unwrap();
    assert_eq!(m.high.value, 3.0);
    assert!(m.high.is_fallback());
}

#[test]
fn comparison_rows_keep_tickers_without_data() {
    let good = RawData::Table(
        PriceTable::new(dates(2))
            .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(vec![10.0, 12.0]))
            .unwrap(),
    );
    let no_close = RawData::Table(
        PriceTable::new(dates(2))
            .with_column(ColumnLabel::flat("Open"), ColumnData::Numeric(vec![1.0, 2.0]))
            .unwrap(),
    );
    let rows = comparison_rows(&[("AAPL", Some(&good)), ("BAD", Some(&no_close)), ("NONE", None)]);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].ticker, "AAPL");
    assert!(rows[0].has_data());
    assert!((rows[0].snapshot.as_ref().unwrap().total_return_pct.unwrap() - 20.0).abs() < 1e-9);
    assert!(!rows[1].has_data());
    assert!(!rows[2].has_data());
}

#[test]
fn newest_first_rows_give_the_same_figures() {
    let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
    let t = PriceTable::new(vec![d(5), d(4), d(3)])
        .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(vec![150.0, 120.0, 100.0]))
        .unwrap();
    let raw = RawData::Table(t.clone());
    let close = resolve_close(Some(&raw), &ResolveOptions::default()).into_series().unwrap();
    let m = compute_snapshot(&close, Some(&t)).unwrap();
    assert_eq!(m.current, 150.0);
    assert_eq!(m.prior, 120.0);
    assert!((m.total_return_pct.unwrap() - 50.0).abs() < 1e-9);
    assert!((m.change_pct - 25.0).abs() < 1e-9);

    let rows = comparison_rows(&[("AAPL", Some(&raw))]);
    assert!((rows[0].snapshot.as_ref().unwrap().total_return_pct.unwrap() - 50.0).abs() < 1e-9);
}

fn combined() -> RawData {
    let numeric = |v: &[f64]| ColumnData::Numeric(v.to_vec());
    RawData::Table(
        PriceTable::new(dates(2))
            .with_column(ColumnLabel::pair("Close", "AAPL"), numeric(&[10.0, 12.0]))
            .unwrap()
            .with_column(ColumnLabel::pair("High", "AAPL"), numeric(&[11.0, 13.0]))
            .unwrap()
            .with_column(ColumnLabel::pair("Volume", "AAPL"), numeric(&[100.0, 300.0]))
            .unwrap()
            .with_column(ColumnLabel::pair("Close", "MSFT"), numeric(&[40.0, 30.0]))
            .unwrap()
            .with_column(ColumnLabel::pair("High", "MSFT"), numeric(&[45.0, 41.0]))
            .unwrap()
            .with_column(ColumnLabel::pair("Volume", "MSFT"), numeric(&[7.0, 9.0]))
            .unwrap(),
    )
}

#[test]
fn combined_table_gives_each_ticker_its_own_columns() {
    let raw = combined();
    let rows = comparison_rows(&[("AAPL", Some(&raw)), ("MSFT", Some(&raw))]);

    let aapl = rows[0].snapshot.as_ref().unwrap();
    assert_eq!(aapl.current, 12.0);
    assert_eq!((aapl.high.value, aapl.high.source), (13.0, Provenance::Column));
    assert_eq!(aapl.avg_volume.value, 200.0);

    let msft = rows[1].snapshot.as_ref().unwrap();
    assert_eq!(msft.current, 30.0);
    assert_eq!((msft.high.value, msft.high.source), (45.0, Provenance::Column));
    assert_eq!(msft.avg_volume.value, 8.0);
    assert!((msft.total_return_pct.unwrap() + 25.0).abs() < 1e-9);
}

#[test]
fn combined_table_exports_per_ticker_columns() {
    let raw = combined();
    let csv = comparison_to_csv(&[("AAPL", Some(&raw)), ("MSFT", Some(&raw))]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,AAPL_Close,AAPL_Volume,MSFT_Close,MSFT_Volume");
    assert_eq!(lines[1], "2024-05-01,10,100,40,7");
    assert_eq!(lines[2], "2024-05-02,12,300,30,9");
}
