use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dash_core::{price_chart, ChartRequest, ChartSpec, CloseSeries, ColumnData, ColumnLabel, PriceTable};
use dash_render_skia::{render_png_bytes, render_svg, RenderOptions};

fn build_spec(n: usize) -> Option<ChartSpec> {
    let start = NaiveDate::from_ymd_opt(2000, 1, 3)?;
    let dates: Vec<NaiveDate> = (0..n).map(|i| start + chrono::Days::new(i as u64)).collect();
    let close: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.01).sin() * 10.0 + i as f64 * 0.0001).collect();
    let volume: Vec<f64> = (0..n).map(|i| 1e6 + (i % 11) as f64 * 1e4).collect();
    let t = PriceTable::new(dates)
        .with_column(ColumnLabel::flat("Close"), ColumnData::Numeric(close.clone()))
        .ok()?
        .with_column(ColumnLabel::flat("Volume"), ColumnData::Numeric(volume))
        .ok()?;
    let series = CloseSeries::from_points(t.index(), &close);
    price_chart("BENCH", Some(&series), Some(&t), &ChartRequest::default()).spec().cloned()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for &n in &[1_825usize, 20_000usize] {
        let Some(spec) = build_spec(n) else { continue };
        let mut opts = RenderOptions::for_spec(&spec);
        opts.draw_labels = false;
        group.bench_function(format!("png_{n}"), |b| {
            b.iter(|| black_box(render_png_bytes(&spec, &opts)));
        });
        group.bench_function(format!("svg_{n}"), |b| {
            b.iter(|| black_box(render_svg(&spec, &opts)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
