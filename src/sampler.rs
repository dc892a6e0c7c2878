//! Streaming extraction of per-channel intensity samples from a raster
//! buffer.
//!
//! The sampler is a pure view over the input image: it validates the buffer
//! once at construction and then yields `(channel, value)` pairs lazily in
//! pixel order. Iteration can be restarted any number of times with
//! [`PixelSampler::samples`].

use crate::errors::Result;
use crate::raster::RasterImage;

#[derive(Debug)]
pub struct PixelSampler<'a> {
    image: &'a RasterImage,
}

impl<'a> PixelSampler<'a> {
    /// Wrap `image`, rejecting it up front if its invariants don't hold.
    pub fn new(image: &'a RasterImage) -> Result<Self> {
        image.validate()?;
        Ok(PixelSampler { image })
    }

    pub fn channels(&self) -> usize {
        self.image.channels as usize
    }

    /// Total number of samples the iterator will yield
    /// (`width * height * channels`).
    pub fn sample_count(&self) -> usize {
        self.image.pixel_count() * self.channels()
    }

    /// Iterate `(channel index, intensity)` pairs, one per sample per pixel,
    /// in row-major pixel order with channels interleaved.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = (usize, u8)> + 'a {
        let channels = self.image.channels as usize;
        self.image
            .data
            .iter()
            .enumerate()
            .map(move |(i, &value)| (i % channels, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChartError;

    #[test]
    fn test_sample_order_and_length() {
        let img = RasterImage::from_raw(2, 1, 3, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let sampler = PixelSampler::new(&img).unwrap();
        assert_eq!(sampler.sample_count(), 6);

        let samples: Vec<_> = sampler.samples().collect();
        assert_eq!(
            samples,
            vec![(0, 10), (1, 20), (2, 30), (0, 40), (1, 50), (2, 60)]
        );
    }

    #[test]
    fn test_restartable() {
        let img = RasterImage::from_raw(1, 1, 1, vec![99]).unwrap();
        let sampler = PixelSampler::new(&img).unwrap();
        let first: Vec<_> = sampler.samples().collect();
        let second: Vec<_> = sampler.samples().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_image_rejected() {
        let img = RasterImage {
            width: 0,
            height: 4,
            channels: 3,
            data: vec![],
        };
        let err = PixelSampler::new(&img).unwrap_err();
        assert!(matches!(err, ChartError::InvalidImage { .. }));
    }
}
