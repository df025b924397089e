use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dash_core::{percent_change_from_start, rolling_mean, CloseSeries};

fn gen_prices(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + (i as f64 * 0.01).sin() * 10.0 + i as f64 * 0.001).collect()
}

fn bench_rolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_mean");
    for &n in &[1_000usize, 100_000usize] {
        let data = gen_prices(n);
        for &window in &[5usize, 30, 100] {
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}_w{window}")), &window, |b, &w| {
                b.iter(|| black_box(rolling_mean(&data, w)));
            });
        }
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let n = 100_000usize;
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let dates: Vec<NaiveDate> = (0..n).map(|i| start + chrono::Days::new(i as u64)).collect();
    let close = CloseSeries::from_points(&dates, &gen_prices(n));
    c.bench_function("percent_change_from_start_100k", |b| {
        b.iter(|| black_box(percent_change_from_start(&close)));
    });
}

criterion_group!(benches, bench_rolling, bench_normalize);
criterion_main!(benches);
