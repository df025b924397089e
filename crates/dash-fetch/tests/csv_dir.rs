// File: crates/dash-fetch/tests/csv_dir.rs
// Purpose: CSV directory source reads flat and two-row headers, filters dates, and treats a missing file as no data.

use std::fs;

use chrono::NaiveDate;
use dash_core::{compute_snapshot, resolve_close, CloseLookup, ColumnLabel, ResolveOptions};
use dash_fetch::{CsvDirSource, FetchError, PriceSource, StaticSource};

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, day).unwrap()
}

#[test]
fn flat_csv_is_filtered_to_half_open_range() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("AAPL.csv"),
        "Date,Open,High,Low,Close,Volume\n\
         2024-01-02,1,2,0.5,1.5,100\n\
         2024-01-03,1,2,0.5,1.6,110\n\
         2024-01-04,1,2,0.5,1.7,120\n\
         not-a-date,1,1,1,1,1\n",
    )
    .unwrap();

    let src = CsvDirSource::new(dir.path());
    let raw = src.fetch("AAPL", d(1, 2), d(1, 4)).unwrap();
    let table = raw.as_table().unwrap();
    assert_eq!(table.index(), &[d(1, 2), d(1, 3)]);
    assert_eq!(table.numeric_field("Close", None).unwrap(), vec![1.5, 1.6]);
    assert!(matches!(resolve_close(Some(&raw), &ResolveOptions::default()), CloseLookup::Exact(_)));
}

#[test]
fn newest_first_file_resolves_oldest_first() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("AAPL.csv"),
        "Date,Close
2024-01-05,150
2024-01-04,120
2024-01-03,100
",
    )
    .unwrap();

    let raw = CsvDirSource::new(dir.path()).fetch("AAPL", d(1, 1), d(2, 1)).unwrap();
    let close = resolve_close(Some(&raw), &ResolveOptions::default()).into_series().unwrap();
    assert_eq!(close.dates(), &[d(1, 3), d(1, 4), d(1, 5)]);
    let m = compute_snapshot(&close, raw.as_table()).unwrap();
    assert_eq!(m.current, 150.0);
    assert!((m.total_return_pct.unwrap() - 50.0).abs() < 1e-9);
}

#[test]
fn two_row_header_yields_pair_labels() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("MSFT.csv"),
        "Price,Close,Volume\nTicker,MSFT,MSFT\nDate,,\n2024-01-02,370.5,100\n2024-01-03,371.0,\n",
    )
    .unwrap();

    let raw = CsvDirSource::new(dir.path()).fetch("MSFT", d(1, 1), d(2, 1)).unwrap();
    let table = raw.as_table().unwrap();
    assert!(table.has_pair_labels());
    assert!(table.column(&ColumnLabel::pair("Close", "MSFT")).is_some());
    assert_eq!(table.len(), 2);
    let volume = table.numeric_field("Volume", Some("MSFT")).unwrap();
    assert!(volume[1].is_nan());

    let lookup = resolve_close(Some(&raw), &ResolveOptions::for_ticker("MSFT"));
    assert_eq!(lookup.series().unwrap().values(), &[370.5, 371.0]);
}

#[test]
fn text_columns_stay_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("X.csv"), "Date,Close,Note\n2024-01-02,1.0,hello\n").unwrap();
    let raw = CsvDirSource::new(dir.path()).fetch("X", d(1, 1), d(2, 1)).unwrap();
    let table = raw.as_table().unwrap();
    assert!(table.numeric_field("Note", None).is_none());
    assert_eq!(table.numeric_field("Close", None).unwrap(), vec![1.0]);
}

#[test]
fn missing_file_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let raw = CsvDirSource::new(dir.path()).fetch("NOPE", d(1, 1), d(2, 1)).unwrap();
    assert!(raw.is_empty());
}

#[test]
fn static_source_returns_canned_results() {
    let src = StaticSource::new().with_failure("BAD", "connection reset");
    assert!(src.fetch("UNKNOWN", d(1, 1), d(2, 1)).unwrap().is_empty());
    let err = src.fetch("BAD", d(1, 1), d(2, 1)).unwrap_err();
    assert!(matches!(err, FetchError::Unavailable(ref m) if m == "connection reset"));
    assert!(matches!(src.fetch("BAD", d(2, 1), d(1, 1)), Err(FetchError::InvalidRange { .. })));
}
