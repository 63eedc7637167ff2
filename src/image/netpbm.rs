use clap::{builder::PossibleValue, ValueEnum};

use crate::error::Error;

/// The four Netpbm variants understood by this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NetpbmFormat {
    PlainGraymap,
    PlainPixmap,
    RawGraymap,
    RawPixmap,
}

impl NetpbmFormat {
    pub fn from_magic_number(magic_number: &str) -> crate::Result<Self> {
        match magic_number {
            "P2" => Ok(Self::PlainGraymap),
            "P3" => Ok(Self::PlainPixmap),
            "P5" => Ok(Self::RawGraymap),
            "P6" => Ok(Self::RawPixmap),
            _ => Err(Error::UnsupportedMagicNumber(magic_number.to_owned())),
        }
    }

    pub fn for_image(channels: u8, encoding: NetpbmEncoding) -> crate::Result<Self> {
        match (channels, encoding) {
            (1, NetpbmEncoding::Plain) => Ok(Self::PlainGraymap),
            (3, NetpbmEncoding::Plain) => Ok(Self::PlainPixmap),
            (1, NetpbmEncoding::Raw) => Ok(Self::RawGraymap),
            (3, NetpbmEncoding::Raw) => Ok(Self::RawPixmap),
            _ => Err(Error::UnsupportedChannelCount(channels)),
        }
    }

    pub fn magic_number(&self) -> &'static str {
        match self {
            Self::PlainGraymap => "P2",
            Self::PlainPixmap => "P3",
            Self::RawGraymap => "P5",
            Self::RawPixmap => "P6",
        }
    }

    pub fn channels(&self) -> u8 {
        match self {
            Self::PlainGraymap | Self::RawGraymap => 1,
            Self::PlainPixmap | Self::RawPixmap => 3,
        }
    }

    pub fn encoding(&self) -> NetpbmEncoding {
        match self {
            Self::PlainGraymap | Self::PlainPixmap => NetpbmEncoding::Plain,
            Self::RawGraymap | Self::RawPixmap => NetpbmEncoding::Raw,
        }
    }
}

/// Whether samples are stored as ASCII decimals or as binary bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum NetpbmEncoding {
    Plain,
    #[default]
    Raw,
}

impl ValueEnum for NetpbmEncoding {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Raw, Self::Plain]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Plain => Some(PossibleValue::new("Plain")),
            Self::Raw => Some(PossibleValue::new("Raw")),
        }
    }
}
