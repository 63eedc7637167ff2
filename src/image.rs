use std::fmt::Display;

use crate::error::Error;

pub mod netpbm;
pub mod reader;
pub mod resampler;
pub mod writer;

pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<Image>;
}

pub trait ImageWriter {
    fn write_image(&mut self) -> crate::Result<()>;
}

/// An 8 bit raster image, stored interleaved and row major.
///
/// The sample of `(row, column, channel)` lives at
/// `(row * width + column) * channels + channel`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u16,
    height: u16,
    channels: u8,
    samples: Vec<u8>,
}

impl Image {
    pub fn new(width: u16, height: u16, channels: u8, samples: Vec<u8>) -> crate::Result<Self> {
        let expected_length = width as usize * height as usize * channels as usize;
        if samples.len() != expected_length {
            return Err(Error::InvalidArgument(format!(
                "{}x{} image with {} channels needs {} samples, but got {}",
                width,
                height,
                channels,
                expected_length,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Interleaves equally sized planes into one image, the plane order
    /// becomes the channel order.
    pub fn from_channels(width: u16, height: u16, planes: &[ColorChannel]) -> crate::Result<Self> {
        let channels = u8::try_from(planes.len()).map_err(|_| {
            Error::InvalidArgument(format!("{} channels do not fit into u8", planes.len()))
        })?;
        if let Some(plane) = planes
            .iter()
            .find(|plane| plane.width != width || plane.height != height)
        {
            return Err(Error::InvalidArgument(format!(
                "channel of size {}x{} does not match image size {}x{}",
                plane.width, plane.height, width, height
            )));
        }
        let number_of_pixels = width as usize * height as usize;
        let mut samples = Vec::with_capacity(number_of_pixels * planes.len());
        for position in 0..number_of_pixels {
            for plane in planes {
                samples.push(plane.dots[position]);
            }
        }
        Self::new(width, height, channels, samples)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn sample(&self, column: u16, row: u16, channel: u8) -> u8 {
        let pixel_index = row as usize * self.width as usize + column as usize;
        self.samples[pixel_index * self.channels as usize + channel as usize]
    }

    pub fn split_channels(&self) -> Vec<ColorChannel> {
        let channels = self.channels as usize;
        (0..channels)
            .map(|channel| ColorChannel {
                width: self.width,
                height: self.height,
                dots: self
                    .samples
                    .iter()
                    .skip(channel)
                    .step_by(channels)
                    .copied()
                    .collect(),
            })
            .collect()
    }
}

/// Output dimensions requested from the resampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single planar channel of an [`Image`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorChannel {
    width: u16,
    height: u16,
    dots: Vec<u8>,
}

impl ColorChannel {
    pub fn new(width: u16, height: u16, dots: Vec<u8>) -> Self {
        Self {
            width,
            height,
            dots,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn dot(&self, column_index: usize, row_index: usize) -> u8 {
        self.dots[column_index + row_index * self.width as usize]
    }
}

#[cfg(test)]
mod test {
    use crate::error::Error;

    use super::{ColorChannel, Image, Size};

    #[rustfmt::skip]
    const TEST_IMAGE: &[u8] = &[
         1,  2,  3,    4,  5,  6,
         7,  8,  9,   10, 11, 12,
        13, 14, 15,   16, 17, 18,
    ];

    fn test_image() -> Image {
        Image::new(2, 3, 3, Vec::from(TEST_IMAGE)).expect("test image must be valid")
    }

    #[test]
    fn sample_lookup() {
        let image = test_image();
        assert_eq!(image.sample(0, 0, 0), 1);
        assert_eq!(image.sample(1, 0, 2), 6);
        assert_eq!(image.sample(0, 2, 1), 14);
        assert_eq!(image.sample(1, 2, 2), 18);
    }

    #[test]
    fn size_of_image() {
        let image = test_image();
        assert_eq!(image.size(), Size::new(2, 3));
        assert_eq!(image.size().area(), 6);
        assert_eq!(image.size().to_string(), "2x3");
    }

    #[test]
    fn mismatching_sample_count() {
        let result = Image::new(2, 2, 3, vec![0; 11]);
        if let Err(Error::InvalidArgument(_)) = result {
            return;
        }
        panic!("Sample count mismatch was not detected");
    }

    #[test]
    fn split_channels() {
        let channels = test_image().split_channels();
        assert_eq!(channels.len(), 3);
        assert_eq!(channels[0], ColorChannel::new(2, 3, vec![1, 4, 7, 10, 13, 16]));
        assert_eq!(channels[1], ColorChannel::new(2, 3, vec![2, 5, 8, 11, 14, 17]));
        assert_eq!(channels[2].dot(1, 1), 12);
    }

    #[test]
    fn split_and_merge_channels() {
        let image = test_image();
        let channels = image.split_channels();
        let merged = Image::from_channels(2, 3, &channels).unwrap();
        assert_eq!(merged, image);
    }

    #[test]
    fn merge_channels_of_different_size() {
        let channels = [
            ColorChannel::new(2, 2, vec![0; 4]),
            ColorChannel::new(2, 1, vec![0; 2]),
        ];
        assert!(Image::from_channels(2, 2, &channels).is_err());
    }
}
