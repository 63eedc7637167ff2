use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
use error::Error;
pub use image::{
    netpbm::NetpbmEncoding,
    reader::netpbm::NetpbmImageReader,
    resampler::{resample, resample_with, BilinearResampler, ResampleOptions, SampleRounding},
    writer::netpbm::{NetpbmImageWriter, NetpbmWriterOptions},
    ColorChannel, Image, ImageReader, ImageWriter, Size,
};
use threadpool::ThreadPool;

mod cli;
pub mod error;
pub mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_file: PathBuf,
    output_file: PathBuf,
    width: u16,
    height: u16,
    rounding: SampleRounding,
    encoding: NetpbmEncoding,
    number_of_threads: usize,
}

impl Arguments {
    pub fn target_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.to_string_lossy().into_owned(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.to_string_lossy().into_owned(), e)
        })
}

fn resample_image(image: &Image, target: Size, options: &ResampleOptions) -> Result<Image> {
    if options.number_of_threads > 1 {
        let threadpool = ThreadPool::new(options.number_of_threads);
        BilinearResampler::with_threadpool(options.rounding, &threadpool).resample(image, target)
    } else {
        BilinearResampler::new(options.rounding).resample(image, target)
    }
}

pub fn resize_netpbm(arguments: &Arguments) -> Result<()> {
    let input_file = open_input_file(&arguments.input_file)?;
    let image = NetpbmImageReader::new(BufReader::new(&input_file)).read_image()?;
    let resample_options = ResampleOptions::from(arguments);
    let output_image = resample_image(&image, arguments.target_size(), &resample_options)?;
    log::info!(
        "Resampled {} to {} using {} threads",
        image.size(),
        output_image.size(),
        resample_options.number_of_threads
    );
    let output_file = open_output_file(&arguments.output_file)?;
    let writer_options = NetpbmWriterOptions::from(arguments);
    let mut writer =
        NetpbmImageWriter::new(BufWriter::new(&output_file), &output_image, &writer_options);
    writer.write_image()
}
