// File: crates/dash-core/tests/export.rs
// Purpose: CSV export of single tables and the multi-ticker join.

use chrono::NaiveDate;
use dash_core::{
    comparison_file_name, comparison_to_csv, single_file_name, table_to_csv, ColumnData, ColumnLabel, PriceTable,
    RawData,
};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
}

#[test]
fn file_names() {
    assert_eq!(single_file_name("AAPL"), "AAPL_stock_data.csv");
    assert_eq!(comparison_file_name(&["AAPL", "MSFT", "GOOGL"]), "stock_comparison_AAPL_MSFT_GOOGL.csv");
}

#[test]
fn table_csv_has_date_column_and_blank_gaps() {
    let t = PriceTable::new(vec![d(1), d(2)])
        .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(vec![1.5, f64::NAN]))
        .unwrap()
        .with_column(ColumnLabel::pair("Volume", "AAPL"), ColumnData::Numeric(vec![100.0, 200.0]))
        .unwrap();
    let csv = table_to_csv(&t).unwrap();
    assert_eq!(csv, "Date,Close,Volume_AAPL\n2024-02-01,1.5,100\n2024-02-02,,200\n");
}

#[test]
fn comparison_csv_outer_joins_on_date() {
    let a = RawData::Table(
        PriceTable::new(vec![d(1), d(2)])
            .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(vec![10.0, 11.0]))
            .unwrap()
            .with_column(ColumnLabel::flat("Volume"), ColumnData::Numeric(vec![5.0, 6.0]))
            .unwrap(),
    );
    let b = RawData::Table(
        PriceTable::new(vec![d(2), d(3)])
            .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(vec![20.0, 21.0]))
            .unwrap(),
    );
    let csv = comparison_to_csv(&[("AAA", Some(&a)), ("BBB", Some(&b)), ("CCC", None)]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,AAA_Close,AAA_Volume,BBB_Close");
    assert_eq!(lines[1], "2024-02-01,10,5,");
    assert_eq!(lines[2], "2024-02-02,11,6,20");
    assert_eq!(lines[3], "2024-02-03,,,21");
    assert_eq!(lines.len(), 4);
}
