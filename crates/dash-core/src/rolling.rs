// File: crates/dash-core/src/rolling.rs
// Summary: Windowed and period-over-period transforms over plain value slices.

use crate::series::CloseSeries;

/// Trailing mean over `window` values. The first `window - 1` outputs are NaN, as is any
/// output whose window contains a NaN. A zero window yields NaN everywhere.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }
    let mut sum = 0.0;
    let mut nan_count = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            nan_count += 1;
        } else {
            sum += v;
        }
        if i >= window {
            let old = values[i - window];
            if old.is_nan() {
                nan_count -= 1;
            } else {
                sum -= old;
            }
        }
        if i + 1 >= window && nan_count == 0 {
            out[i] = sum / window as f64;
        }
    }
    out
}

/// Period-over-period fractional change. The first output is NaN; a zero prior gives a
/// non-finite value which callers are expected to filter.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    for w in values.windows(2) {
        out.push(w[1] / w[0] - 1.0);
    }
    out
}

/// Percent change of every point relative to the first (the first point maps to 0).
/// `None` when the series is empty or starts at zero.
pub fn percent_change_from_start(close: &CloseSeries) -> Option<Vec<f64>> {
    let start = close.first()?;
    if start == 0.0 {
        return None;
    }
    Some(close.values().iter().map(|v| (v / start - 1.0) * 100.0).collect())
}
