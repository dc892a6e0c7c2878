//! Raw raster image values crossing the crate boundary.
//!
//! A `RasterImage` is a flat, row-major, channel-interleaved u8 buffer plus
//! its dimensions. Callers decode whatever platform image object they hold
//! into this form; the chart pipeline hands one back the same way.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::errors::{ChartError, Result};

/// An RGBA color value. Channel colors and backgrounds are specified with
/// straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 255, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);
    pub const GRAY: Rgba = Rgba::rgb(128, 128, 128);
}

/// A raw raster image: `width * height` pixels of `channels` interleaved
/// u8 samples each, row-major.
///
/// Supported channel counts: 1 (grayscale), 3 (RGB), 4 (RGBA).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Build an image from raw parts, validating the buffer invariants.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let img = RasterImage {
            width,
            height,
            channels,
            data,
        };
        img.validate()?;
        Ok(img)
    }

    /// Allocate a `width x height` image filled with `color`, always RGBA.
    /// Used by the renderer for the output buffer.
    pub(crate) fn filled_rgba(width: u32, height: u32, color: Rgba) -> Self {
        let pixel = [color.r, color.g, color.b, color.a];
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        RasterImage {
            width,
            height,
            channels: 4,
            data,
        }
    }

    /// Check the structural invariants: positive dimensions, a supported
    /// channel count, and a buffer of exactly `width * height * channels`
    /// bytes.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::invalid_image(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !matches!(self.channels, 1 | 3 | 4) {
            return Err(ChartError::invalid_image(format!(
                "channel count must be 1, 3 or 4, got {}",
                self.channels
            )));
        }
        let expected = self.width as usize * self.height as usize * self.channels as usize;
        if self.data.len() != expected {
            return Err(ChartError::invalid_image(format!(
                "buffer length {} does not match {}x{}x{} = {}",
                self.data.len(),
                self.width,
                self.height,
                self.channels,
                expected
            )));
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes per row (`width * channels`).
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }
}

/// Convert a decoded `image` crate value into the raw form the pipeline
/// consumes. Grayscale and RGB images keep their channel count; everything
/// else goes through RGBA.
pub fn from_dynamic(image: &DynamicImage) -> RasterImage {
    match image {
        DynamicImage::ImageLuma8(gray) => RasterImage {
            width: gray.width(),
            height: gray.height(),
            channels: 1,
            data: gray.as_raw().clone(),
        },
        DynamicImage::ImageRgb8(rgb) => RasterImage {
            width: rgb.width(),
            height: rgb.height(),
            channels: 3,
            data: rgb.as_raw().clone(),
        },
        other => {
            log::debug!("converting {:?} image through RGBA", other.color());
            let rgba = other.to_rgba8();
            RasterImage {
                width: rgba.width(),
                height: rgba.height(),
                channels: 4,
                data: rgba.into_raw(),
            }
        }
    }
}

impl RasterImage {
    /// Re-encode an RGBA image (the renderer's output) as an `image` crate
    /// buffer for display or saving by the host.
    pub fn into_rgba_image(self) -> Result<image::RgbaImage> {
        self.validate()?;
        if self.channels != 4 {
            return Err(ChartError::invalid_image(format!(
                "expected an RGBA image, got {} channels",
                self.channels
            )));
        }
        // from_raw only fails on a length mismatch, which validate ruled out
        image::RgbaImage::from_raw(self.width, self.height, self.data).ok_or_else(|| {
            ChartError::invalid_image("buffer does not fit the stated dimensions")
        })
    }
}
