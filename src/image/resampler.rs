use std::{
    cmp,
    ops::Range,
    sync::{mpsc, Arc},
};

use clap::{builder::PossibleValue, ValueEnum};
use threadpool::ThreadPool;

use super::{ColorChannel, Image, Size};
use crate::{error::Error, logger, Arguments, Result};

/// How an interpolated value is turned back into an 8 bit sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SampleRounding {
    /// Drop the fractional part.
    #[default]
    Truncate,
    /// Round half away from zero.
    Nearest,
}

impl ValueEnum for SampleRounding {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Truncate, Self::Nearest]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Truncate => Some(PossibleValue::new("Truncate")),
            Self::Nearest => Some(PossibleValue::new("Nearest")),
        }
    }
}

impl SampleRounding {
    fn apply(&self, value: f64) -> u8 {
        let value = match self {
            Self::Truncate => value.trunc(),
            Self::Nearest => value.round(),
        };
        value.clamp(0.0, 255.0) as u8
    }
}

pub struct ResampleOptions {
    pub rounding: SampleRounding,
    pub number_of_threads: usize,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            rounding: SampleRounding::Truncate,
            number_of_threads: 1,
        }
    }
}

impl From<&Arguments> for ResampleOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            rounding: value.rounding,
            number_of_threads: value.number_of_threads,
        }
    }
}

/// Source pixels per destination pixel along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    pub fn new(source: Size, target: Size) -> Self {
        Self {
            x: source.width as f64 / target.width as f64,
            y: source.height as f64 / target.height as f64,
        }
    }
}

/// The two neighbouring source indices of one destination index and the
/// weight of the upper one.
#[derive(Clone, Copy, Debug, PartialEq)]
struct AxisSample {
    low: usize,
    high: usize,
    weight: f64,
}

fn axis_samples(source_length: u16, target_length: u16, scale: f64) -> Vec<AxisSample> {
    let last_index = source_length as usize - 1;
    (0..target_length as usize)
        .map(|target_index| {
            let position = (target_index as f64 + 0.5) * scale - 0.5;
            let position = position.clamp(0.0, last_index as f64);
            let low = position.floor() as usize;
            AxisSample {
                low,
                high: cmp::min(low + 1, last_index),
                weight: position - low as f64,
            }
        })
        .collect()
}

fn lerp(from: f64, to: f64, weight: f64) -> f64 {
    from + weight * (to - from)
}

struct SamplingGrid {
    columns: Vec<AxisSample>,
    rows: Vec<AxisSample>,
    rounding: SampleRounding,
}

impl SamplingGrid {
    fn new(source: Size, target: Size, rounding: SampleRounding) -> Self {
        let factors = ScaleFactors::new(source, target);
        logger::log_scale_factors(source, target, &factors);
        Self {
            columns: axis_samples(source.width, target.width, factors.x),
            rows: axis_samples(source.height, target.height, factors.y),
            rounding,
        }
    }

    fn resample_rows(&self, channel: &ColorChannel, row_range: Range<usize>) -> Vec<u8> {
        let mut dots = Vec::with_capacity(row_range.len() * self.columns.len());
        for row in &self.rows[row_range] {
            for column in &self.columns {
                let top = lerp(
                    channel.dot(column.low, row.low) as f64,
                    channel.dot(column.high, row.low) as f64,
                    column.weight,
                );
                let bottom = lerp(
                    channel.dot(column.low, row.high) as f64,
                    channel.dot(column.high, row.high) as f64,
                    column.weight,
                );
                dots.push(self.rounding.apply(lerp(top, bottom, row.weight)));
            }
        }
        dots
    }
}

/// Rows `first_row..` of one output channel, computed by a worker.
struct RowBand {
    channel_index: usize,
    first_row: usize,
    dots: Vec<u8>,
}

/// Half-pixel-center bilinear resampler.
///
/// Every channel is interpolated on its own. Without a thread pool the
/// work is done on the calling thread; with one, each channel is cut into
/// bands of output rows which are computed as independent jobs.
pub struct BilinearResampler<'a> {
    rounding: SampleRounding,
    threadpool: Option<&'a ThreadPool>,
}

impl<'a> BilinearResampler<'a> {
    pub fn new(rounding: SampleRounding) -> Self {
        Self {
            rounding,
            threadpool: None,
        }
    }

    pub fn with_threadpool(rounding: SampleRounding, threadpool: &'a ThreadPool) -> Self {
        Self {
            rounding,
            threadpool: Some(threadpool),
        }
    }

    pub fn resample(&self, source: &Image, target: Size) -> Result<Image> {
        Self::check_arguments(source, target)?;
        if source.size() == target {
            log::debug!("Target size equals source size {}, copying image", target);
            return Ok(source.clone());
        }
        let grid = SamplingGrid::new(source.size(), target, self.rounding);
        let planes = source.split_channels();
        let planes = match self.threadpool {
            Some(threadpool) => Self::resample_in_threadpool(threadpool, planes, grid)?,
            None => planes
                .iter()
                .map(|plane| grid.resample_rows(plane, 0..grid.rows.len()))
                .collect(),
        };
        let planes: Vec<ColorChannel> = planes
            .into_iter()
            .map(|dots| ColorChannel::new(target.width, target.height, dots))
            .collect();
        Image::from_channels(target.width, target.height, &planes)
    }

    fn check_arguments(source: &Image, target: Size) -> Result<()> {
        if source.size().area() == 0 {
            return Err(Error::InvalidArgument(format!(
                "source image of size {} has no pixels",
                source.size()
            )));
        }
        if source.channels() == 0 {
            return Err(Error::InvalidArgument(
                "source image has no channels".to_owned(),
            ));
        }
        if target.area() == 0 {
            return Err(Error::InvalidArgument(format!(
                "target size {} must be positive in both dimensions",
                target
            )));
        }
        Ok(())
    }

    fn resample_in_threadpool(
        threadpool: &ThreadPool,
        planes: Vec<ColorChannel>,
        grid: SamplingGrid,
    ) -> Result<Vec<Vec<u8>>> {
        let number_of_rows = grid.rows.len();
        let row_length = grid.columns.len();
        let band_height = number_of_rows.div_ceil(threadpool.max_count()).max(1);
        let mut outputs = vec![vec![0_u8; number_of_rows * row_length]; planes.len()];
        let grid = Arc::new(grid);
        let (sender, receiver) = mpsc::channel();
        let mut number_of_bands = 0;
        for (channel_index, plane) in planes.into_iter().enumerate() {
            let plane = Arc::new(plane);
            for first_row in (0..number_of_rows).step_by(band_height) {
                let row_range = first_row..cmp::min(first_row + band_height, number_of_rows);
                let sender = sender.clone();
                let plane = Arc::clone(&plane);
                let grid = Arc::clone(&grid);
                threadpool.execute(move || {
                    let dots = grid.resample_rows(&plane, row_range);
                    let band = RowBand {
                        channel_index,
                        first_row,
                        dots,
                    };
                    if sender.send(band).is_err() {
                        log::warn!("Row band starting at {} was dropped", first_row);
                    }
                });
                number_of_bands += 1;
            }
        }
        drop(sender);

        let mut number_of_received_bands = 0;
        for band in receiver.iter() {
            let offset = band.first_row * row_length;
            outputs[band.channel_index][offset..offset + band.dots.len()]
                .copy_from_slice(&band.dots);
            log::trace!(
                "Received {} rows of channel {} starting at row {}",
                band.dots.len() / row_length,
                band.channel_index,
                band.first_row
            );
            number_of_received_bands += 1;
        }
        if number_of_received_bands != number_of_bands {
            return Err(Error::ResampleWorkerFailed(
                number_of_bands - number_of_received_bands,
            ));
        }
        Ok(outputs)
    }
}

/// Resamples `source` to `target` on the calling thread, truncating
/// interpolated values.
pub fn resample(source: &Image, target: Size) -> Result<Image> {
    resample_with(source, target, SampleRounding::Truncate)
}

pub fn resample_with(source: &Image, target: Size, rounding: SampleRounding) -> Result<Image> {
    BilinearResampler::new(rounding).resample(source, target)
}

#[cfg(test)]
mod test {
    use threadpool::ThreadPool;

    use super::{
        axis_samples, resample, resample_with, AxisSample, BilinearResampler, SampleRounding,
        ScaleFactors,
    };
    use crate::{
        error::Error,
        image::{Image, Size},
    };

    fn gradient_image(width: u16, height: u16, channels: u8) -> Image {
        let mut samples = Vec::new();
        for row in 0..height as usize {
            for column in 0..width as usize {
                for channel in 0..channels as usize {
                    samples.push(((row * 37 + column * 23 + channel * 71) % 256) as u8);
                }
            }
        }
        Image::new(width, height, channels, samples).unwrap()
    }

    fn assert_invalid_argument(result: crate::Result<Image>) {
        match result {
            Err(Error::InvalidArgument(_)) => {}
            Err(e) => panic!("Expected invalid argument, but got {}", e),
            Ok(_) => panic!("Invalid argument was not detected"),
        }
    }

    #[test]
    fn scale_factors() {
        let factors = ScaleFactors::new(Size::new(4, 3), Size::new(8, 1));
        assert_eq!(factors.x, 0.5);
        assert_eq!(factors.y, 3.0);
    }

    #[test]
    fn axis_samples_downscale() {
        let samples = axis_samples(4, 2, 2.0);
        assert_eq!(
            samples,
            vec![
                AxisSample {
                    low: 0,
                    high: 1,
                    weight: 0.5
                },
                AxisSample {
                    low: 2,
                    high: 3,
                    weight: 0.5
                },
            ]
        );
    }

    #[test]
    fn axis_samples_clamp_to_border() {
        let samples = axis_samples(2, 4, 0.5);
        assert_eq!(samples[0].low, 0);
        assert_eq!(samples[0].weight, 0.0);
        assert_eq!(samples[3].low, 1);
        assert_eq!(samples[3].high, 1);
        assert_eq!(samples[3].weight, 0.0);
    }

    #[test]
    fn same_size_returns_copy() {
        let image = gradient_image(5, 4, 3);
        let result = resample(&image, Size::new(5, 4)).unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn output_has_target_shape() {
        let image = gradient_image(7, 5, 3);
        for (width, height) in [(1, 1), (3, 2), (7, 9), (14, 10), (20, 3)] {
            let result = resample(&image, Size::new(width, height)).unwrap();
            assert_eq!(result.width(), width);
            assert_eq!(result.height(), height);
            assert_eq!(result.channels(), 3);
            assert_eq!(
                result.samples().len(),
                width as usize * height as usize * 3
            );
        }
    }

    #[test]
    fn channels_are_independent() {
        let image = gradient_image(4, 3, 3);
        let permutation = [2_u8, 0, 1];
        let mut permuted_samples = Vec::new();
        for row in 0..3 {
            for column in 0..4 {
                for channel in permutation {
                    permuted_samples.push(image.sample(column, row, channel));
                }
            }
        }
        let permuted = Image::new(4, 3, 3, permuted_samples).unwrap();
        let target = Size::new(9, 5);
        let result = resample(&image, target).unwrap();
        let permuted_result = resample(&permuted, target).unwrap();
        for row in 0..target.height {
            for column in 0..target.width {
                for (index, channel) in permutation.iter().enumerate() {
                    assert_eq!(
                        permuted_result.sample(column, row, index as u8),
                        result.sample(column, row, *channel)
                    );
                }
            }
        }
    }

    #[test]
    fn upsampling_clamps_to_border() {
        let image = Image::new(2, 2, 1, vec![0, 100, 200, 255]).unwrap();
        let result = resample(&image, Size::new(4, 4)).unwrap();
        assert_eq!(result.sample(0, 0, 0), 0);
        assert_eq!(result.sample(3, 0, 0), 100);
        assert_eq!(result.sample(0, 3, 0), 200);
        assert_eq!(result.sample(3, 3, 0), 255);
        // 25 + 0.25 * (213.75 - 25)
        assert_eq!(result.sample(1, 1, 0), 72);
    }

    #[test]
    fn monotonic_ramp_stays_monotonic() {
        let image = Image::new(6, 1, 1, vec![0, 10, 50, 51, 200, 255]).unwrap();
        let result = resample(&image, Size::new(17, 1)).unwrap();
        let row = result.samples();
        assert!(
            row.windows(2).all(|pair| pair[0] <= pair[1]),
            "row is not monotonic: {:?}",
            row
        );
        assert_eq!(row[0], 0);
        assert_eq!(row[16], 255);
    }

    #[test]
    fn downsampling_uniform_image() {
        let image = Image::new(7, 5, 3, vec![137; 7 * 5 * 3]).unwrap();
        for (width, height) in [(3, 2), (1, 1), (6, 5)] {
            let result = resample(&image, Size::new(width, height)).unwrap();
            assert!(result.samples().iter().all(|sample| *sample == 137));
        }
    }

    #[test]
    fn single_pixel_source() {
        let image = Image::new(1, 1, 3, vec![42, 7, 255]).unwrap();
        let result = resample(&image, Size::new(5, 3)).unwrap();
        for row in 0..3 {
            for column in 0..5 {
                assert_eq!(result.sample(column, row, 0), 42);
                assert_eq!(result.sample(column, row, 1), 7);
                assert_eq!(result.sample(column, row, 2), 255);
            }
        }
    }

    #[test]
    fn rounding_policies() {
        let image = Image::new(2, 1, 1, vec![0, 10]).unwrap();
        let truncated = resample_with(&image, Size::new(4, 1), SampleRounding::Truncate).unwrap();
        let rounded = resample_with(&image, Size::new(4, 1), SampleRounding::Nearest).unwrap();
        assert_eq!(truncated.samples(), &[0, 2, 7, 10]);
        assert_eq!(rounded.samples(), &[0, 3, 8, 10]);
    }

    #[test]
    fn zero_target_size() {
        let image = gradient_image(3, 3, 3);
        assert_invalid_argument(resample(&image, Size::new(0, 3)));
        assert_invalid_argument(resample(&image, Size::new(3, 0)));
    }

    #[test]
    fn empty_source() {
        let image = Image::new(0, 3, 3, Vec::new()).unwrap();
        assert_invalid_argument(resample(&image, Size::new(3, 3)));
    }

    #[test]
    fn source_without_channels() {
        let image = Image::new(2, 2, 0, Vec::new()).unwrap();
        assert_invalid_argument(resample(&image, Size::new(4, 4)));
    }

    #[test]
    fn threadpool_matches_sequential() {
        let threadpool = ThreadPool::new(4);
        let image = gradient_image(7, 5, 3);
        for (width, height) in [(13, 9), (3, 2), (1, 7), (40, 1)] {
            let target = Size::new(width, height);
            let sequential = resample(&image, target).unwrap();
            let parallel = BilinearResampler::with_threadpool(SampleRounding::Truncate, &threadpool)
                .resample(&image, target)
                .unwrap();
            assert_eq!(parallel, sequential, "mismatch for target size {}", target);
        }
    }
}
