//! Histogram accumulation and normalization.
//!
//! Binning is a single reduction pass over the samples. The operation is
//! commutative and associative over channels and bins, so the parallel path
//! partitions the buffer into row-aligned chunks, accumulates a private
//! partial histogram per chunk, and merges them by element-wise addition.
//! The result is identical to the sequential pass regardless of partitioning.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ChartError, Result};
use crate::raster::RasterImage;
use crate::sampler::PixelSampler;

/// Intensity values are u8, so 256 is the finest possible binning.
pub const MAX_BINS: usize = 256;

/// How bin counts are scaled into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Normalization {
    /// Divide every bin by the single maximum across all channels, so
    /// relative channel magnitudes stay visually comparable.
    #[default]
    Global,
    /// Divide each channel by its own maximum.
    PerChannel,
}

/// Per-channel bin counts. Shape invariant: every channel has exactly
/// `bin_count` bins, and each channel's counts sum to the source pixel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bin_count: usize,
    channels: Vec<Vec<u64>>,
}

impl Histogram {
    fn zeroed(bin_count: usize, channel_count: usize) -> Self {
        Histogram {
            bin_count,
            channels: vec![vec![0u64; bin_count]; channel_count],
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn counts(&self, channel: usize) -> &[u64] {
        &self.channels[channel]
    }

    /// Element-wise sum of two same-shaped partial histograms. This is the
    /// only synchronization point of the parallel build.
    pub fn merge(&mut self, other: &Histogram) {
        debug_assert_eq!(self.bin_count, other.bin_count);
        debug_assert_eq!(self.channels.len(), other.channels.len());
        for (mine, theirs) in self.channels.iter_mut().zip(&other.channels) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
    }

    /// Largest count across all bins of all channels.
    pub fn max_count(&self) -> u64 {
        self.channels
            .iter()
            .flat_map(|bins| bins.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Scale counts into [0, 1] fractions. A zero maximum (no samples) maps
    /// everything to 0 instead of dividing by zero.
    pub fn normalize(&self, mode: Normalization) -> NormalizedHistogram {
        let global_max = self.max_count();
        let channels = self
            .channels
            .iter()
            .map(|bins| {
                let max = match mode {
                    Normalization::Global => global_max,
                    Normalization::PerChannel => bins.iter().copied().max().unwrap_or(0),
                };
                bins.iter()
                    .map(|&count| {
                        if max == 0 {
                            0.0
                        } else {
                            count as f32 / max as f32
                        }
                    })
                    .collect()
            })
            .collect();
        NormalizedHistogram {
            bin_count: self.bin_count,
            channels,
        }
    }
}

/// Same shape as [`Histogram`], counts replaced by fractions in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHistogram {
    bin_count: usize,
    channels: Vec<Vec<f32>>,
}

impl NormalizedHistogram {
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn values(&self, channel: usize) -> &[f32] {
        &self.channels[channel]
    }

    /// Build directly from per-channel fractions. Values must already be in
    /// [0, 1] and every channel must have the same length.
    pub fn from_values(channels: Vec<Vec<f32>>) -> Result<Self> {
        let bin_count = channels.first().map(|c| c.len()).unwrap_or(0);
        if bin_count == 0 || channels.is_empty() {
            return Err(ChartError::invalid_config(
                "normalized histogram needs at least one channel with at least one bin",
            ));
        }
        for bins in &channels {
            if bins.len() != bin_count {
                return Err(ChartError::invalid_config(
                    "all channels must have the same bin count",
                ));
            }
            if bins.iter().any(|v| !(0.0..=1.0).contains(v)) {
                return Err(ChartError::invalid_config(
                    "normalized values must lie in [0, 1]",
                ));
            }
        }
        Ok(NormalizedHistogram {
            bin_count,
            channels,
        })
    }
}

/// Accumulates histograms with a configurable bin count.
#[derive(Debug, Clone, Copy)]
pub struct HistogramBuilder {
    bin_count: usize,
}

impl Default for HistogramBuilder {
    fn default() -> Self {
        HistogramBuilder {
            bin_count: MAX_BINS,
        }
    }
}

impl HistogramBuilder {
    /// `bin_count` must be a positive divisor of 256 so that every bin covers
    /// the same number of intensity values.
    pub fn new(bin_count: usize) -> Result<Self> {
        if bin_count == 0 || MAX_BINS % bin_count != 0 {
            return Err(ChartError::invalid_config(format!(
                "bin count must be a positive divisor of 256, got {}",
                bin_count
            )));
        }
        Ok(HistogramBuilder { bin_count })
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    #[inline]
    fn bin_index(&self, value: u8) -> usize {
        // Exact for value == 255: 255 * bin_count / 256 == bin_count - 1
        (value as usize * self.bin_count / MAX_BINS).min(self.bin_count - 1)
    }

    /// Single sequential reduction pass over the sample stream.
    pub fn build_sequential(&self, image: &RasterImage) -> Result<Histogram> {
        let sampler = PixelSampler::new(image)?;
        let mut histogram = Histogram::zeroed(self.bin_count, sampler.channels());
        for (channel, value) in sampler.samples() {
            histogram.channels[channel][self.bin_index(value)] += 1;
        }
        Ok(histogram)
    }

    /// Parallel accumulation over row-aligned chunks, merged by addition.
    /// Produces counts identical to [`Self::build_sequential`].
    pub fn build(&self, image: &RasterImage) -> Result<Histogram> {
        let sampler = PixelSampler::new(image)?;
        let channel_count = sampler.channels();

        // Chunk boundaries must land on row boundaries so the interleaved
        // channel phase stays aligned within each worker's slice.
        let row_stride = image.row_stride();
        let rows_per_chunk = (image.height as usize / num_cpus::get()).max(1);
        let chunk_bytes = rows_per_chunk * row_stride;

        debug!(
            width = image.width,
            height = image.height,
            channels = channel_count,
            bins = self.bin_count,
            rows_per_chunk,
            "accumulating histogram"
        );

        let histogram = image
            .data
            .par_chunks(chunk_bytes)
            .map(|chunk| {
                let mut partial = Histogram::zeroed(self.bin_count, channel_count);
                for (i, &value) in chunk.iter().enumerate() {
                    partial.channels[i % channel_count][self.bin_index(value)] += 1;
                }
                partial
            })
            .reduce(
                || Histogram::zeroed(self.bin_count, channel_count),
                |mut acc, partial| {
                    acc.merge(&partial);
                    acc
                },
            );

        Ok(histogram)
    }
}
