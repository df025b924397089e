// File: crates/dash-render-skia/src/grid.rs
// Summary: Grid/tick layout helpers for value and date axes.

use chrono::{Datelike, NaiveDate};

/// Round tick values (1/2/5 x 10^k steps) inside `[min, max]`, roughly `target` of them.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min || target == 0 {
        return Vec::new();
    }
    let raw = (max - min) / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);
    let first = (min / step).ceil() * step;
    let mut out = Vec::new();
    let mut v = first;
    while v <= max + step * 1e-9 {
        // Snap -0.0 and float drift so labels read cleanly.
        out.push(if v.abs() < step * 1e-9 { 0.0 } else { v });
        v += step;
    }
    out
}

/// Evenly spaced date ticks, snapped to the first of a month when the range spans
/// more than two months.
pub fn date_ticks(start: NaiveDate, end: NaiveDate, target: usize) -> Vec<NaiveDate> {
    let days = (end - start).num_days();
    if days <= 0 || target == 0 {
        return vec![start];
    }
    if days > 62 {
        let months = (days / 30).max(1) as u32;
        let step = months.div_ceil(target as u32).max(1);
        let mut out = Vec::new();
        let mut cur = first_of_next_month(start);
        while cur <= end {
            out.push(cur);
            cur = add_months(cur, step);
        }
        if !out.is_empty() {
            return out;
        }
    }
    let step = (days as f64 / target as f64).ceil().max(1.0) as u64;
    let mut out = Vec::new();
    let mut cur = start;
    while cur <= end {
        out.push(cur);
        match cur.checked_add_days(chrono::Days::new(step)) {
            Some(next) => cur = next,
            None => break,
        }
    }
    out
}

fn first_of_next_month(d: NaiveDate) -> NaiveDate {
    if d.day() == 1 {
        return d;
    }
    add_months(d.with_day(1).unwrap_or(d), 1)
}

fn add_months(d: NaiveDate, n: u32) -> NaiveDate {
    d.checked_add_months(chrono::Months::new(n)).unwrap_or(NaiveDate::MAX)
}
