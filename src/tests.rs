//! End-to-end pipeline scenarios.

use crate::*;

#[test]
fn test_grayscale_2x2_four_bins() {
    // Pixels [0, 128, 255, 255] with 4 bins: 0 -> bin 0, 128 -> bin 2,
    // 255 -> bin 3 twice
    let image = RasterImage::from_raw(2, 2, 1, vec![0, 128, 255, 255]).unwrap();
    let builder = HistogramBuilder::new(4).unwrap();
    let hist = builder.build(&image).unwrap();
    assert_eq!(hist.counts(0), &[1, 0, 1, 2]);

    let norm = hist.normalize(Normalization::Global);
    assert_eq!(norm.values(0), &[0.5, 0.0, 0.5, 1.0]);
}

#[test]
fn test_all_black_1x1_rgb() {
    let image = RasterImage::from_raw(1, 1, 3, vec![0, 0, 0]).unwrap();
    let hist = HistogramBuilder::default().build(&image).unwrap();
    for channel in 0..3 {
        assert_eq!(hist.counts(channel)[0], 1);
        assert_eq!(hist.counts(channel)[1..].iter().sum::<u64>(), 0);
    }

    // The single spike is the global maximum, so its bar fills the chart;
    // every other column is untouched background
    let options = ChartOptions {
        width: 256,
        height: 100,
        ..Default::default()
    };
    let chart = histogram_chart(&image, &options).unwrap();
    assert_eq!((chart.width, chart.height), (256, 100));

    let px = |x: usize, y: usize| {
        let i = (y * 256 + x) * 4;
        [chart.data[i], chart.data[i + 1], chart.data[i + 2]]
    };
    // Column 0 carries the stacked R/G/B bars (blue drawn last, opaque)
    assert_eq!(px(0, 0), [0, 0, 255]);
    // Column 1 onward is background
    assert_eq!(px(1, 99), [255, 255, 255]);
}

#[test]
fn test_channel_sums_survive_full_pipeline() {
    let data: Vec<u8> = (0..64 * 64 * 4).map(|i| (i % 251) as u8).collect();
    let image = RasterImage::from_raw(64, 64, 4, data).unwrap();
    let hist = HistogramBuilder::new(32).unwrap().build(&image).unwrap();
    for channel in 0..4 {
        assert_eq!(hist.counts(channel).iter().sum::<u64>(), 64 * 64);
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let data: Vec<u8> = (0..48 * 32 * 3).map(|i| (i * 13 % 256) as u8).collect();
    let image = RasterImage::from_raw(48, 32, 3, data).unwrap();
    let options = ChartOptions {
        bin_count: 64,
        channel_colors: ChartSpec::translucent_colors(3),
        draw_axis: true,
        ..Default::default()
    };
    let a = histogram_chart(&image, &options).unwrap();
    let b = histogram_chart(&image, &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_chart_narrower_than_bin_count() {
    let data: Vec<u8> = (0..100).map(|i| (i * 2) as u8).collect();
    let image = RasterImage::from_raw(10, 10, 1, data).unwrap();
    let options = ChartOptions {
        bin_count: 256,
        width: 50,
        height: 40,
        ..Default::default()
    };
    let chart = histogram_chart(&image, &options).unwrap();
    assert_eq!((chart.width, chart.height), (50, 40));
    assert_eq!(chart.data.len(), 50 * 40 * 4);
}

#[test]
fn test_invalid_image_surfaces_before_output() {
    let image = RasterImage {
        width: 0,
        height: 10,
        channels: 3,
        data: vec![],
    };
    let err = histogram_chart(&image, &ChartOptions::default()).unwrap_err();
    assert!(matches!(err, ChartError::InvalidImage { .. }));
}

#[test]
fn test_invalid_bin_count_surfaces() {
    let image = RasterImage::from_raw(1, 1, 1, vec![0]).unwrap();
    let options = ChartOptions {
        bin_count: 5,
        ..Default::default()
    };
    let err = histogram_chart(&image, &options).unwrap_err();
    assert!(matches!(err, ChartError::InvalidConfiguration { .. }));
}

#[test]
fn test_options_json_round_trip() {
    let options = ChartOptions {
        bin_count: 64,
        width: 320,
        height: 140,
        background: Rgba::rgba(20, 20, 20, 255),
        channel_colors: ChartSpec::translucent_colors(3),
        bar_gap: 1,
        draw_axis: true,
        normalization: Normalization::PerChannel,
    };
    let json = serde_json::to_string(&options).unwrap();
    let back: ChartOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(options, back);
}

#[test]
fn test_image_crate_boundary() {
    // Decode-side conversion in, encode-side conversion out
    let dynamic = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        4,
        4,
        image::Rgb([10, 200, 90]),
    ));
    let raster = from_dynamic(&dynamic);
    assert_eq!(raster.channels, 3);

    let chart = histogram_chart(&raster, &ChartOptions::default()).unwrap();
    let encoded = chart.into_rgba_image().unwrap();
    assert_eq!(encoded.dimensions(), (256, 200));
}
