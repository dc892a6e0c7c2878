//! histochart - per-channel image histogram computation and chart rendering.
//!
//! One pure transformation: a raw [`RasterImage`] goes in, a bar-chart
//! [`RasterImage`] depicting its tonal distribution comes out. The pipeline
//! is three composable stages connected by immutable values:
//!
//! 1. [`PixelSampler`] streams `(channel, intensity)` samples,
//! 2. [`HistogramBuilder`] bins them and normalizes the counts,
//! 3. [`ChartRenderer`] rasterizes the normalized bins into RGBA.
//!
//! [`histogram_chart`] wires the stages together for callers that just want
//! the chart. Every invocation is independent; there is no process-wide
//! state, so concurrent calls with different options cannot interfere.
//!
//! ```
//! use histochart::{histogram_chart, ChartOptions, RasterImage};
//!
//! let image = RasterImage::from_raw(2, 2, 1, vec![0, 128, 255, 255])?;
//! let chart = histogram_chart(&image, &ChartOptions::default())?;
//! assert_eq!((chart.width, chart.height), (256, 200));
//! # Ok::<(), histochart::ChartError>(())
//! ```

pub mod chart;
pub mod errors;
pub mod histogram;
pub mod logging;
pub mod raster;
pub mod sampler;

#[cfg(test)]
mod tests;

pub use chart::{ChartRenderer, ChartSpec};
pub use errors::{ChartError, Result};
pub use histogram::{Histogram, HistogramBuilder, Normalization, NormalizedHistogram};
pub use raster::{from_dynamic, RasterImage, Rgba};
pub use sampler::PixelSampler;

use serde::{Deserialize, Serialize};

/// Per-call configuration for the full pipeline. Serializable so hosts can
/// persist a user's chart preferences alongside their other settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Histogram bins per channel; must be a positive divisor of 256.
    pub bin_count: usize,
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    /// Empty means the per-channel-count default palette.
    pub channel_colors: Vec<Rgba>,
    pub bar_gap: u32,
    pub draw_axis: bool,
    pub normalization: Normalization,
}

impl Default for ChartOptions {
    fn default() -> Self {
        let spec = ChartSpec::default();
        ChartOptions {
            bin_count: histogram::MAX_BINS,
            width: spec.width,
            height: spec.height,
            background: spec.background,
            channel_colors: spec.channel_colors,
            bar_gap: spec.bar_gap,
            draw_axis: spec.draw_axis,
            normalization: Normalization::default(),
        }
    }
}

impl ChartOptions {
    fn chart_spec(&self) -> ChartSpec {
        ChartSpec {
            width: self.width,
            height: self.height,
            background: self.background,
            channel_colors: self.channel_colors.clone(),
            bar_gap: self.bar_gap,
            draw_axis: self.draw_axis,
        }
    }
}

/// Compute `image`'s per-channel histogram and render it as a bar chart.
///
/// Configuration and input are validated up front; on any error nothing is
/// rendered and the typed failure is returned to the caller.
pub fn histogram_chart(image: &RasterImage, options: &ChartOptions) -> Result<RasterImage> {
    let builder = HistogramBuilder::new(options.bin_count)?;
    let renderer = ChartRenderer::new(options.chart_spec())?;

    let histogram = builder.build(image)?;
    let normalized = histogram.normalize(options.normalization);
    renderer.render(&normalized)
}
