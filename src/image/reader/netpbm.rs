use std::io::Read;

use super::super::netpbm::{NetpbmEncoding, NetpbmFormat};
use super::super::Image;
use super::super::ImageReader;
use crate::Error;

/// Reads plain and raw PGM/PPM images into 8 bit [`Image`]s.
///
/// Samples of images with a max value other than 255 are rescaled to the
/// range `0..=255`.
pub struct NetpbmImageReader<T: Read> {
    reader: T,
}

impl<T: Read> NetpbmImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }
}

impl<T: Read> ImageReader for NetpbmImageReader<T> {
    fn read_image(&mut self) -> crate::Result<Image> {
        let header = {
            let mut tokenizer = NetpbmTokenizer::new(&mut self.reader);
            HeaderParser::new(&mut tokenizer).parse_header()?
        };
        log::debug!(
            "Reading {} image of size {}x{} with max value {}",
            header.format.magic_number(),
            header.width,
            header.height,
            header.max_value
        );
        let samples = match header.format.encoding() {
            NetpbmEncoding::Plain => {
                let mut tokenizer = NetpbmTokenizer::new(&mut self.reader);
                PlainBodyParser::new(&mut tokenizer, &header).parse_samples()?
            }
            NetpbmEncoding::Raw => read_raw_samples(&mut self.reader, &header)?,
        };
        Image::new(
            header.width,
            header.height,
            header.format.channels(),
            samples,
        )
    }
}

struct NetpbmTokenizer<'a, R: Read> {
    reader: &'a mut R,
    buffer: Vec<u8>,
}

impl<'a, R: Read> NetpbmTokenizer<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        NetpbmTokenizer {
            reader,
            buffer: Vec::new(),
        }
    }
}

impl<R: Read> Iterator for NetpbmTokenizer<'_, R> {
    type Item = String;

    /// Reads up to and including the whitespace byte after the next token,
    /// so a raw body starts right where the tokenizer stopped.
    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        let mut byte = [0; 1];
        let mut in_comment = false;

        while self.reader.read(&mut byte).unwrap_or(0) > 0 {
            if in_comment {
                if byte[0] == b'\n' {
                    in_comment = false;
                    if !self.buffer.is_empty() {
                        break;
                    }
                }
                continue;
            }
            if byte[0] == b'#' {
                in_comment = true;
                continue;
            }
            if byte[0].is_ascii_whitespace() {
                if !self.buffer.is_empty() {
                    break;
                }
            } else {
                self.buffer.push(byte[0]);
            }
        }

        if self.buffer.is_empty() {
            return None;
        }

        Some(String::from_utf8_lossy(&self.buffer).into_owned())
    }
}

const MAGIC_NUMBER_TOKEN_NAME: &str = "Magic Number Header";
const WIDTH_HEADER_TOKEN_NAME: &str = "Width Header";
const HEIGHT_HEADER_TOKEN_NAME: &str = "Height Header";
const MAX_VALUE_HEADER_TOKEN_NAME: &str = "Max Value Header";
const SAMPLE_VALUE_TOKEN_NAME: &str = "Sample Value";

struct Header {
    format: NetpbmFormat,
    width: u16,
    height: u16,
    max_value: u16,
}

impl Header {
    fn number_of_samples(&self) -> usize {
        self.width as usize * self.height as usize * self.format.channels() as usize
    }
}

struct HeaderParser<'a, T> {
    tokenizer: &'a mut T,
}

impl<'a, T> HeaderParser<'a, T>
where
    T: Iterator<Item = String>,
{
    fn new(tokenizer: &'a mut T) -> Self {
        Self { tokenizer }
    }

    fn parse_header(&mut self) -> crate::Result<Header> {
        let format = self.parse_magic_number()?;
        let width = self.parse_dimension(WIDTH_HEADER_TOKEN_NAME)?;
        let height = self.parse_dimension(HEIGHT_HEADER_TOKEN_NAME)?;
        let max_value = self.parse_max_value()?;
        Ok(Header {
            format,
            width,
            height,
            max_value,
        })
    }

    fn next_token(&mut self, token_name: &'static str) -> crate::Result<String> {
        self.tokenizer
            .next()
            .ok_or(Error::NetpbmFileDoesNotContainRequiredToken(token_name))
    }

    fn parse_magic_number(&mut self) -> crate::Result<NetpbmFormat> {
        let magic_number = self.next_token(MAGIC_NUMBER_TOKEN_NAME)?;
        NetpbmFormat::from_magic_number(&magic_number)
    }

    fn parse_dimension(&mut self, token_name: &'static str) -> crate::Result<u16> {
        self.next_token(token_name)?
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(token_name))
    }

    fn parse_max_value(&mut self) -> crate::Result<u16> {
        let max_value: u32 = self
            .next_token(MAX_VALUE_HEADER_TOKEN_NAME)?
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(MAX_VALUE_HEADER_TOKEN_NAME))?;
        match u16::try_from(max_value) {
            Ok(max_value) if max_value > 0 => Ok(max_value),
            _ => Err(Error::InvalidMaxValue(max_value)),
        }
    }
}

/// Collects the components of one pixel of a plain body.
#[derive(Clone, Copy)]
struct Dot {
    buffer: [u8; 3],
    channels: usize,
    index: usize,
}

impl Dot {
    fn new(channels: u8) -> Self {
        Self {
            buffer: [u8::default(); 3],
            channels: channels as usize,
            index: 0,
        }
    }

    fn components(&self) -> &[u8] {
        &self.buffer[..self.index]
    }

    fn push_component(&mut self, component: u8) {
        if self.is_complete() {
            return;
        }
        self.buffer[self.index] = component;
        self.index += 1;
    }

    fn is_complete(&self) -> bool {
        self.index == self.channels
    }

    fn reset(&mut self) {
        self.index = 0;
    }

    fn is_empty(&self) -> bool {
        self.index == 0
    }
}

struct PlainBodyParser<'a, T> {
    tokenizer: &'a mut T,
    header: &'a Header,
}

impl<'a, T> PlainBodyParser<'a, T>
where
    T: Iterator<Item = String>,
{
    fn new(tokenizer: &'a mut T, header: &'a Header) -> Self {
        Self { tokenizer, header }
    }

    fn parse_samples(&mut self) -> crate::Result<Vec<u8>> {
        let mut current_dot = Dot::new(self.header.format.channels());
        let mut samples = Vec::with_capacity(self.header.number_of_samples());
        for token in self.tokenizer.by_ref() {
            let sample = Self::parse_sample_value(&token)?;
            current_dot.push_component(scale_to_eight_bits(sample, self.header.max_value)?);
            if current_dot.is_complete() {
                samples.extend_from_slice(current_dot.components());
                current_dot.reset();
            }
        }
        Self::check_pixel_was_complete(&current_dot)?;
        Self::check_sample_count_matches_header(&samples, self.header)?;
        Ok(samples)
    }

    fn parse_sample_value(token: &str) -> crate::Result<u16> {
        token
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(SAMPLE_VALUE_TOKEN_NAME))
    }

    fn check_pixel_was_complete(dot: &Dot) -> crate::Result<()> {
        if !dot.is_empty() {
            return Err(Error::IncompletePixelParsed(dot.index));
        }
        Ok(())
    }

    fn check_sample_count_matches_header(samples: &[u8], header: &Header) -> crate::Result<()> {
        if samples.len() != header.number_of_samples() {
            return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
        }
        Ok(())
    }
}

fn read_raw_samples<R: Read>(reader: &mut R, header: &Header) -> crate::Result<Vec<u8>> {
    let bytes_per_sample = if header.max_value > 255 { 2 } else { 1 };
    let mut bytes = vec![0_u8; header.number_of_samples() * bytes_per_sample];
    reader
        .read_exact(&mut bytes)
        .map_err(|_| Error::MismatchOfSizeBetweenHeaderAndValues)?;
    if bytes_per_sample == 1 {
        bytes
            .into_iter()
            .map(|sample| scale_to_eight_bits(sample as u16, header.max_value))
            .collect()
    } else {
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .map(|sample| scale_to_eight_bits(sample, header.max_value))
            .collect()
    }
}

fn scale_to_eight_bits(sample: u16, max_value: u16) -> crate::Result<u8> {
    if sample > max_value {
        return Err(Error::SampleExceedsMaxValue(sample, max_value));
    }
    if max_value == 255 {
        return Ok(sample as u8);
    }
    let max_value = max_value as u32;
    Ok(((sample as u32 * 255 + max_value / 2) / max_value) as u8)
}
