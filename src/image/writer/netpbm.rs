use std::io::Write;

use crate::{
    error::Error,
    image::{
        netpbm::{NetpbmEncoding, NetpbmFormat},
        Image, ImageWriter,
    },
    Arguments,
};

const MAX_VALUE: u8 = 255;
const MAX_PLAIN_LINE_LENGTH: usize = 70;

pub struct NetpbmWriterOptions {
    pub encoding: NetpbmEncoding,
}

impl From<&Arguments> for NetpbmWriterOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            encoding: value.encoding,
        }
    }
}

/// Writes an 8 bit [`Image`] as PGM (one channel) or PPM (three channels).
pub struct NetpbmImageWriter<'a, T: Write> {
    writer: T,
    image: &'a Image,
    options: &'a NetpbmWriterOptions,
}

impl<'a, T: Write> NetpbmImageWriter<'a, T> {
    pub fn new(writer: T, image: &'a Image, options: &'a NetpbmWriterOptions) -> Self {
        Self {
            writer,
            image,
            options,
        }
    }

    fn write_header(&mut self, format: NetpbmFormat) -> crate::Result<()> {
        writeln!(
            self.writer,
            "{}\n{} {}\n{}",
            format.magic_number(),
            self.image.width(),
            self.image.height(),
            MAX_VALUE
        )
        .map_err(|_| Error::FailedToWriteHeader)
    }

    fn write_raw_samples(&mut self) -> crate::Result<()> {
        self.writer
            .write_all(self.image.samples())
            .map_err(|_| Error::FailedToWriteImageData)
    }

    fn write_plain_samples(&mut self) -> crate::Result<()> {
        let image = self.image;
        let mut line = String::with_capacity(MAX_PLAIN_LINE_LENGTH);
        for sample in image.samples() {
            let token = sample.to_string();
            if !line.is_empty() && line.len() + 1 + token.len() > MAX_PLAIN_LINE_LENGTH {
                self.write_plain_line(&line)?;
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&token);
        }
        if !line.is_empty() {
            self.write_plain_line(&line)?;
        }
        Ok(())
    }

    fn write_plain_line(&mut self, line: &str) -> crate::Result<()> {
        writeln!(self.writer, "{}", line).map_err(|_| Error::FailedToWriteImageData)
    }
}

impl<T: Write> ImageWriter for NetpbmImageWriter<'_, T> {
    fn write_image(&mut self) -> crate::Result<()> {
        let format = NetpbmFormat::for_image(self.image.channels(), self.options.encoding)?;
        log::debug!(
            "Writing {} image of size {}",
            format.magic_number(),
            self.image.size()
        );
        self.write_header(format)?;
        match format.encoding() {
            NetpbmEncoding::Plain => self.write_plain_samples()?,
            NetpbmEncoding::Raw => self.write_raw_samples()?,
        }
        self.writer
            .flush()
            .map_err(|_| Error::FailedToWriteImageData)
    }
}
