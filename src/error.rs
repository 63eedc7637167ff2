use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    InvalidArgument(String),
    ResampleWorkerFailed(usize),
    NetpbmFileDoesNotContainRequiredToken(&'static str),
    UnsupportedMagicNumber(String),
    ParsingOfTokenFailed(&'static str),
    InvalidMaxValue(u32),
    SampleExceedsMaxValue(u16, u16),
    IncompletePixelParsed(usize),
    MismatchOfSizeBetweenHeaderAndValues,
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    UnsupportedChannelCount(u8),
    FailedToWriteHeader,
    FailedToWriteImageData,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(reason) => {
                write!(f, "Invalid argument: {}", reason)
            }
            Self::ResampleWorkerFailed(missing_bands) => {
                write!(
                    f,
                    "Resampling worker failed, {} row bands were not delivered",
                    missing_bands
                )
            }
            Self::NetpbmFileDoesNotContainRequiredToken(token_name) => {
                write!(f, "Expected token '{}' not found in Netpbm file", token_name)
            }
            Self::UnsupportedMagicNumber(magic_number) => {
                write!(
                    f,
                    "Unsupported magic number '{}'. Expected one of P2, P3, P5 or P6.",
                    magic_number
                )
            }
            Self::ParsingOfTokenFailed(token_name) => {
                write!(f, "Parsing of token '{}' failed", token_name)
            }
            Self::InvalidMaxValue(max_value) => {
                write!(
                    f,
                    "Max value {} is out of range. Expected a value between 1 and 65535.",
                    max_value
                )
            }
            Self::SampleExceedsMaxValue(sample, max_value) => {
                write!(
                    f,
                    "Sample value {} is greater than max value {}",
                    sample, max_value
                )
            }
            Self::IncompletePixelParsed(number_of_tokens_parsed) => {
                write!(
                    f,
                    "Incomplete pixel parsed. Got {} trailing components.",
                    number_of_tokens_parsed
                )
            }
            Self::MismatchOfSizeBetweenHeaderAndValues => {
                write!(
                    f,
                    "Number of samples does not match the size provided in header"
                )
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::UnsupportedChannelCount(channels) => {
                write!(
                    f,
                    "Images with {} channels can not be written as Netpbm",
                    channels
                )
            }
            Self::FailedToWriteHeader => write!(f, "Failed to write image header"),
            Self::FailedToWriteImageData => write!(f, "Failed to write image data"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error) => Some(error),
            _ => None,
        }
    }
}
