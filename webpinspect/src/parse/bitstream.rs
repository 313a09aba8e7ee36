#![allow(missing_docs)]

use std::fmt;

use bytes::{BufMut, Bytes};
use webpinspect_common::Result;

use crate::reader::ChunkReader;

use super::chunk_type::{VP8, VP8L};
use super::error::ParseResultExt;
use super::{ChunkHeader, FourCC, ParseError, ParsedChunk};

/// A `VP8 ` or `VP8L` image bitstream chunk, copied verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBitstream {
    pub format: BitstreamFormat,
    pub data: Bytes,
}

/// The compression format of an [`ImageBitstream`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitstreamFormat {
    /// Lossy, `VP8 `.
    Vp8,
    /// Lossless, `VP8L`.
    Vp8l,
}

//
// ImageBitstream impls
//

impl ImageBitstream {
    pub fn new(format: BitstreamFormat, data: impl Into<Bytes>) -> Self {
        Self { format, data: data.into() }
    }

    /// Read the `header.len` byte payload of a bitstream chunk of the given `format`.
    pub fn parse(
        reader: &mut ChunkReader<'_>,
        format: BitstreamFormat,
        header: &ChunkHeader,
    ) -> Result<Self, ParseError> {
        let data = reader.read_bytes(header.len).while_parsing_field(header.name, "bitstream")?;
        Ok(Self { format, data })
    }
}

impl ParsedChunk for ImageBitstream {
    fn name(&self) -> FourCC {
        self.format.name()
    }

    fn encoded_len(&self) -> u32 {
        self.data.len() as u32
    }

    fn put_buf(&self, buf: &mut dyn BufMut) {
        buf.put_slice(&self.data);
    }
}

impl fmt::Display for ImageBitstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bitstream, {} bytes", self.format, self.data.len())
    }
}

//
// BitstreamFormat impls
//

impl BitstreamFormat {
    /// The format carried by chunks tagged `name`, if any.
    pub fn from_name(name: FourCC) -> Option<Self> {
        match name {
            VP8 => Some(Self::Vp8),
            VP8L => Some(Self::Vp8l),
            _ => None,
        }
    }

    /// The chunk tag carrying this format.
    pub fn name(&self) -> FourCC {
        match self {
            Self::Vp8 => VP8,
            Self::Vp8l => VP8L,
        }
    }
}

impl fmt::Display for BitstreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vp8 => f.write_str("lossy"),
            Self::Vp8l => f.write_str("lossless"),
        }
    }
}
