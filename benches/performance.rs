use criterion::{black_box, criterion_group, criterion_main, Criterion};
use histochart::{histogram_chart, ChartOptions, HistogramBuilder, RasterImage};

fn test_image(width: u32, height: u32, channels: u8) -> RasterImage {
    let len = width as usize * height as usize * channels as usize;
    let data = (0..len).map(|i| (i * 31 % 256) as u8).collect();
    RasterImage::from_raw(width, height, channels, data).unwrap()
}

fn bench_histogram_accumulation(c: &mut Criterion) {
    let image = test_image(1920, 1080, 3);
    let builder = HistogramBuilder::default();

    c.bench_function("histogram_sequential_1920x1080", |b| {
        b.iter(|| builder.build_sequential(black_box(&image)).unwrap())
    });

    c.bench_function("histogram_parallel_1920x1080", |b| {
        b.iter(|| builder.build(black_box(&image)).unwrap())
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let image = test_image(1920, 1080, 4);
    let options = ChartOptions::default();

    c.bench_function("histogram_chart_1920x1080", |b| {
        b.iter(|| histogram_chart(black_box(&image), black_box(&options)).unwrap())
    });
}

criterion_group!(benches, bench_histogram_accumulation, bench_full_pipeline);
criterion_main!(benches);
