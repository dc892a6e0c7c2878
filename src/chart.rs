//! Rasterization of a normalized histogram into an RGBA bar chart.
//!
//! Channels are drawn in ascending index order (red, then green, then blue,
//! then alpha for RGBA sources), each bar alpha-composited with the standard
//! "over" operator so translucent channel colors blend where bars overlap.
//! All layout math is integer or rounded f32 on fixed inputs, so two renders
//! of the same histogram and spec are byte-identical.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ChartError, Result};
use crate::histogram::NormalizedHistogram;
use crate::raster::{RasterImage, Rgba};

/// Rows reserved at the bottom of the chart when the axis is drawn:
/// a 1-px baseline plus 3 rows of tick marks under it.
const AXIS_RESERVE: u32 = 4;

const AXIS_COLOR: Rgba = Rgba::BLACK;

/// Immutable description of one chart render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    /// One color per source channel. Empty means the default palette for the
    /// histogram's channel count (gray for 1 channel, red/green/blue for 3,
    /// plus gray for the 4th).
    pub channel_colors: Vec<Rgba>,
    /// Pixels between adjacent bar slots.
    pub bar_gap: u32,
    pub draw_axis: bool,
}

impl Default for ChartSpec {
    fn default() -> Self {
        ChartSpec {
            width: 256,
            height: 200,
            background: Rgba::WHITE,
            channel_colors: Vec::new(),
            bar_gap: 0,
            draw_axis: false,
        }
    }
}

impl ChartSpec {
    /// Default palette: opaque primaries, gray for grayscale input and for
    /// the alpha channel of RGBA input.
    pub fn default_colors(channel_count: usize) -> Vec<Rgba> {
        match channel_count {
            1 => vec![Rgba::GRAY],
            3 => vec![Rgba::RED, Rgba::GREEN, Rgba::BLUE],
            _ => [Rgba::RED, Rgba::GREEN, Rgba::BLUE, Rgba::GRAY]
                .into_iter()
                .cycle()
                .take(channel_count)
                .collect(),
        }
    }

    /// Semi-transparent variant of the default palette, for charts where
    /// multi-channel overlap should stay readable.
    pub fn translucent_colors(channel_count: usize) -> Vec<Rgba> {
        Self::default_colors(channel_count)
            .into_iter()
            .map(|c| Rgba::rgba(c.r, c.g, c.b, 120))
            .collect()
    }
}

/// Renders histograms against a fixed, pre-validated [`ChartSpec`].
#[derive(Debug)]
pub struct ChartRenderer {
    spec: ChartSpec,
}

impl ChartRenderer {
    pub fn new(spec: ChartSpec) -> Result<Self> {
        if spec.width == 0 || spec.height == 0 {
            return Err(ChartError::invalid_config(format!(
                "chart dimensions must be positive, got {}x{}",
                spec.width, spec.height
            )));
        }
        if spec.bar_gap >= spec.width {
            return Err(ChartError::invalid_config(format!(
                "bar gap {} leaves no room for bars in a {}-px wide chart",
                spec.bar_gap, spec.width
            )));
        }
        Ok(ChartRenderer { spec })
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    /// Rasterize `histogram` into a new `width x height` RGBA image.
    ///
    /// Never returns a partially drawn buffer: all validation happens before
    /// the output is allocated.
    pub fn render(&self, histogram: &NormalizedHistogram) -> Result<RasterImage> {
        let spec = &self.spec;
        let channel_count = histogram.channel_count();

        let colors = if spec.channel_colors.is_empty() {
            ChartSpec::default_colors(channel_count)
        } else if spec.channel_colors.len() >= channel_count {
            spec.channel_colors.clone()
        } else {
            return Err(ChartError::invalid_config(format!(
                "{} channel colors configured but histogram has {} channels",
                spec.channel_colors.len(),
                channel_count
            )));
        };

        // Coarsen until every bar slot is at least 1 px wide. Output
        // dimensions never change, only the effective bin count does.
        let values = coarsen_to_fit(histogram, spec.width, spec.bar_gap);
        let bins = values[0].len();

        let gap = spec.bar_gap as usize;
        let total_gap = gap * (bins - 1);
        let slot_width = (spec.width as usize - total_gap) / bins;

        let axis_reserve = if spec.draw_axis {
            AXIS_RESERVE.min(spec.height - 1)
        } else {
            0
        };
        let bar_area = (spec.height - axis_reserve) as usize;

        debug!(
            bins,
            slot_width,
            bar_area,
            channels = channel_count,
            "rendering histogram chart"
        );

        let mut out = RasterImage::filled_rgba(spec.width, spec.height, spec.background);

        for (channel, bins_for_channel) in values.iter().enumerate() {
            let color = colors[channel];
            for (bin, &value) in bins_for_channel.iter().enumerate() {
                let bar_height = (value * bar_area as f32).round() as usize;
                if bar_height == 0 {
                    continue;
                }
                let x0 = bin * (slot_width + gap);
                let y1 = bar_area; // exclusive; baseline sits right below
                let y0 = y1 - bar_height.min(bar_area);
                fill_rect(&mut out, x0, y0, slot_width, y1 - y0, color);
            }
        }

        // A 1-px-tall chart has no room below the bars for an axis
        if axis_reserve > 0 {
            draw_axis(&mut out, bins, slot_width, gap, axis_reserve as usize);
        }

        Ok(out)
    }
}

/// Merge adjacent bins pairwise from the low end until `bins` slots of at
/// least 1 px (plus gaps) fit into `width`. Merged values take the max of
/// the pair so they stay in [0, 1] and peaks survive coarsening.
fn coarsen_to_fit(histogram: &NormalizedHistogram, width: u32, bar_gap: u32) -> Vec<Vec<f32>> {
    let mut values: Vec<Vec<f32>> = (0..histogram.channel_count())
        .map(|c| histogram.values(c).to_vec())
        .collect();

    let fits = |bins: usize| {
        bins + bar_gap as usize * (bins - 1) <= width as usize
    };

    while !fits(values[0].len()) && values[0].len() > 1 {
        for bins in values.iter_mut() {
            let merged: Vec<f32> = bins
                .chunks(2)
                .map(|pair| pair.iter().copied().fold(0.0, f32::max))
                .collect();
            *bins = merged;
        }
    }
    values
}

/// Fill a solid rectangle, compositing `color` over the existing pixels.
fn fill_rect(image: &mut RasterImage, x0: usize, y0: usize, w: usize, h: usize, color: Rgba) {
    let stride = image.row_stride();
    for y in y0..y0 + h {
        let row = y * stride;
        for x in x0..(x0 + w).min(image.width as usize) {
            let i = row + x * 4;
            composite_over(&mut image.data[i..i + 4], color);
        }
    }
}

/// Standard "over" compositing with straight alpha.
fn composite_over(dst: &mut [u8], src: Rgba) {
    let sa = src.a as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        dst.copy_from_slice(&[0, 0, 0, 0]);
        return;
    }
    let blend = |s: u8, d: u8| -> u8 {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    dst[0] = blend(src.r, dst[0]);
    dst[1] = blend(src.g, dst[1]);
    dst[2] = blend(src.b, dst[2]);
    dst[3] = (out_a * 255.0).round() as u8;
}

/// 1-px baseline across the full width, plus tick marks below it at every
/// `max(1, bins / 8)` bin boundaries. Placement depends only on the chart
/// width and the (effective) bin count.
fn draw_axis(image: &mut RasterImage, bins: usize, slot_width: usize, gap: usize, reserve: usize) {
    let width = image.width as usize;
    let height = image.height as usize;
    let baseline_y = height - reserve;

    let stride = image.row_stride();
    for x in 0..width {
        let i = baseline_y * stride + x * 4;
        write_pixel(&mut image.data[i..i + 4], AXIS_COLOR);
    }

    let tick_step = (bins / 8).max(1);
    let tick_rows = baseline_y + 1..height;
    for bin in (0..bins).step_by(tick_step) {
        let x = bin * (slot_width + gap);
        for y in tick_rows.clone() {
            let i = y * stride + x * 4;
            write_pixel(&mut image.data[i..i + 4], AXIS_COLOR);
        }
    }
}

fn write_pixel(dst: &mut [u8], color: Rgba) {
    dst.copy_from_slice(&[color.r, color.g, color.b, color.a]);
}
