// File: crates/dash-render-skia/src/downsample.rs
// Summary: Downsampling utilities (LTTB for XY) and gap-aware splitting of line traces.

/// Largest-Triangle-Three-Buckets downsampling for XY series.
/// Returns up to `threshold` points preserving overall shape.
pub fn lttb(points: &[(f64, f64)], threshold: usize) -> Vec<(f64, f64)> {
    let n = points.len();
    if threshold == 0 || n == 0 { return Vec::new(); }
    if threshold >= n || n <= 2 { return points.to_vec(); }
    if threshold == 1 { return vec![points[0]]; }
    if threshold == 2 { return vec![points[0], points[n - 1]]; }

    let bucket_size = (n - 2) as f64 / (threshold - 2) as f64;
    let mut sampled = Vec::with_capacity(threshold);
    sampled.push(points[0]);

    let mut a = 0usize; // index of the point chosen from the previous bucket

    for i in 0..(threshold - 2) {
        let start = (1.0 + (i as f64) * bucket_size).floor() as usize;
        let end = (1.0 + ((i + 1) as f64) * bucket_size).floor().min((n - 1) as f64) as usize;

        // Average of the next bucket.
        let next_end = (1.0 + ((i + 2) as f64) * bucket_size).floor().min(n as f64 - 1.0) as usize;
        let rs = end.max(1);
        let re = next_end.max(rs + 1).min(n);
        let (mut avg_x, mut avg_y) = (0.0f64, 0.0f64);
        for p in &points[rs..re] {
            avg_x += p.0;
            avg_y += p.1;
        }
        let count = (re - rs).max(1) as f64;
        avg_x /= count;
        avg_y /= count;

        // Point in the current bucket forming the largest triangle with (a, next average).
        let (a_x, a_y) = points[a];
        let mut max_area = -1.0f64;
        let mut max_idx = start;
        for (k, p) in points.iter().enumerate().take(end.max(start + 1)).skip(start) {
            let area = ((a_x - p.0) * (avg_y - a_y) - (a_x - avg_x) * (p.1 - a_y)).abs();
            if area > max_area {
                max_area = area;
                max_idx = k;
            }
        }
        sampled.push(points[max_idx]);
        a = max_idx;
    }

    sampled.push(points[n - 1]);
    sampled
}

/// Split `xy` at non-finite y values into runs of consecutive finite points.
pub fn finite_runs(xy: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut cur: Vec<(f64, f64)> = Vec::new();
    for &(x, y) in xy {
        if y.is_finite() {
            cur.push((x, y));
        } else if !cur.is_empty() {
            runs.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        runs.push(cur);
    }
    runs
}

/// Downsample each run so the total stays near `max_points`; each run keeps a share
/// proportional to its length (at least its two end points).
pub fn fit_runs(runs: Vec<Vec<(f64, f64)>>, max_points: usize) -> Vec<Vec<(f64, f64)>> {
    let total: usize = runs.iter().map(Vec::len).sum();
    if max_points == 0 || total <= max_points {
        return runs;
    }
    runs.into_iter()
        .map(|run| {
            let share = ((run.len() as f64 / total as f64) * max_points as f64).round() as usize;
            lttb(&run, share.max(2))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lttb_keeps_ends_and_size() {
        let pts: Vec<(f64, f64)> = (0..1000).map(|i| (i as f64, (i as f64 * 0.1).sin())).collect();
        let out = lttb(&pts, 100);
        assert_eq!(out.len(), 100);
        assert_eq!(out.first(), pts.first());
        assert_eq!(out.last(), pts.last());
        assert!(out.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn runs_split_on_gaps() {
        let runs = finite_runs(&[(0.0, f64::NAN), (1.0, 1.0), (2.0, 2.0), (3.0, f64::NAN), (4.0, 4.0)]);
        assert_eq!(runs, vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(4.0, 4.0)]]);
    }

    #[test]
    fn fit_runs_caps_long_traces() {
        let run: Vec<(f64, f64)> = (0..5000).map(|i| (i as f64, i as f64)).collect();
        let out = fit_runs(vec![run], 500);
        assert_eq!(out[0].len(), 500);
    }
}
