// File: crates/dash-core/src/series.rs
// Summary: Date-indexed series: bare named series from sources and the resolved Close series.
// Notes:
// - `CloseSeries` holds finite observations only; missing trading days are gaps, not NaNs.

use chrono::NaiveDate;

use crate::table::TableError;

/// Canonical label of a resolved close series.
pub const CLOSE_LABEL: &str = "Close";

/// A single date-indexed column delivered without a surrounding table.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedSeries {
    pub name: Option<String>,
    pub index: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl NamedSeries {
    pub fn new(name: Option<String>, index: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, TableError> {
        if index.len() != values.len() {
            return Err(TableError::LengthMismatch {
                label: name.unwrap_or_else(|| "<series>".to_string()),
                expected: index.len(),
                got: values.len(),
            });
        }
        Ok(Self { name, index, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CloseSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl CloseSeries {
    /// Build from paired dates/values, dropping non-finite values. Points come out sorted
    /// by date; equal dates keep their input order.
    pub fn from_points(dates: &[NaiveDate], values: &[f64]) -> Self {
        let mut paired: Vec<(NaiveDate, f64)> = dates
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| v.is_finite())
            .map(|(d, v)| (*d, *v))
            .collect();
        paired.sort_by_key(|(d, _)| *d);
        let (dates, values) = paired.into_iter().unzip();
        Self { dates, values }
    }

    pub fn label(&self) -> &'static str {
        CLOSE_LABEL
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Second-to-last value, if there is one.
    pub fn prior(&self) -> Option<f64> {
        self.values.len().checked_sub(2).map(|i| self.values[i])
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Sample standard deviation (n - 1); `None` below two points.
    pub fn std_dev(&self) -> Option<f64> {
        sample_std(&self.values)
    }
}

pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn from_points_drops_gaps_and_sorts_by_date() {
        let s = CloseSeries::from_points(&[d(3), d(1), d(2)], &[3.0, f64::NAN, 2.0]);
        assert_eq!(s.dates(), &[d(2), d(3)]);
        assert_eq!(s.values(), &[2.0, 3.0]);
        assert_eq!(s.prior(), Some(2.0));
        assert_eq!(s.last(), Some(3.0));
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let s = CloseSeries::from_points(&[d(2), d(1), d(2)], &[5.0, 1.0, 7.0]);
        assert_eq!(s.values(), &[1.0, 5.0, 7.0]);
    }

    #[test]
    fn std_dev_needs_two_points() {
        assert_eq!(CloseSeries::from_points(&[d(1)], &[5.0]).std_dev(), None);
        let s = CloseSeries::from_points(&[d(1), d(2), d(3)], &[1.0, 2.0, 3.0]);
        assert!((s.std_dev().unwrap() - 1.0).abs() < 1e-12);
    }
}
