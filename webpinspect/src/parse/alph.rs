#![allow(missing_docs)]

use std::fmt;

use bytes::{BufMut, Bytes};
use webpinspect_common::{ensure_attach, Result};

use crate::reader::ChunkReader;

use super::bits::extract_bits;
use super::chunk_type::ALPH;
use super::error::{ParseResultExt, PayloadTooShort};
use super::{ChunkHeader, FourCC, ParseChunk, ParseError, ParsedChunk, WebpPrim};

/// An `ALPH` alpha channel chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alpha {
    /// `0` for uncompressed, `1` for lossless compression.
    pub compression_method: u8,
    /// `0` none, `1` horizontal, `2` vertical, `3` gradient.
    pub filtering_method: u8,
    /// `0` none, `1` level reduction.
    pub preprocessing: u8,
    pub bitstream: Bytes,
}

//
// Alpha impls
//

impl Alpha {
    const FLAGS_LEN: u32 = u8::ENCODED_LEN;

    /// # Panics
    ///
    /// Panics if a method does not fit in its 2-bit field.
    fn flags(&self) -> u8 {
        let Self { compression_method, filtering_method, preprocessing, .. } = *self;
        for (field, value) in [("compression", compression_method), ("filtering", filtering_method), ("preprocessing", preprocessing)] {
            assert!(value <= 0b11, "{field} method {value} does not fit in 2 bits");
        }
        compression_method | filtering_method << 2 | preprocessing << 4
    }
}

impl ParseChunk for Alpha {
    fn parse(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, ParseError> {
        let name = header.name;
        ensure_attach!(
            header.len >= Self::FLAGS_LEN,
            ParseError::BufferUnderrun,
            PayloadTooShort(header.len, Self::FLAGS_LEN),
        );

        let flags = reader.read::<u8>().while_parsing_field(name, "flags")?;
        let bitstream = reader
            .read_bytes(header.len - Self::FLAGS_LEN)
            .while_parsing_field(name, "bitstream")?;

        Ok(Self {
            compression_method: extract_bits(flags, &[0, 1]),
            filtering_method: extract_bits(flags, &[2, 3]) >> 2,
            preprocessing: extract_bits(flags, &[4, 5]) >> 4,
            bitstream,
        })
    }
}

impl ParsedChunk for Alpha {
    fn name(&self) -> FourCC {
        ALPH
    }

    fn encoded_len(&self) -> u32 {
        Self::FLAGS_LEN + self.bitstream.len() as u32
    }

    fn put_buf(&self, mut buf: &mut dyn BufMut) {
        self.flags().put_buf(&mut buf);
        buf.put_slice(&self.bitstream);
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { compression_method, filtering_method, preprocessing, bitstream } = self;
        write!(
            f,
            "alpha compression {compression_method}, filtering {filtering_method}, \
             preprocessing {preprocessing}, {} bytes",
            bitstream.len(),
        )
    }
}
