use bytes::{Buf, Bytes};
use webpinspect_common::{ensure_attach, Result};

use crate::parse::error::ParseResultExt;
use crate::parse::{ChunkHeader, ParseChunk, ParseError, WebpPrim};
use crate::Config;

/// A cursor over a fully resident WebP chunk stream.
///
/// Every read advances the cursor by the number of bytes consumed and fails with [`ParseError::BufferUnderrun`] if
/// fewer bytes remain than requested.
pub struct ChunkReader<'a> {
    input: &'a [u8],
    buf: &'a [u8],
    pad_odd_chunks: bool,
}

//
// ChunkReader impls
//

impl<'a> ChunkReader<'a> {
    /// Construct a reader over `input` with the default [`Config`].
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, &Config::default())
    }

    /// Construct a reader over `input` with the given [`Config`].
    pub fn with_config(input: &'a [u8], config: &Config) -> Self {
        Self { input, buf: input, pad_odd_chunks: config.pad_odd_chunks }
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// The offset of the cursor from the start of the input.
    pub fn offset(&self) -> u64 {
        (self.input.len() - self.buf.len()) as u64
    }

    /// Read a fixed-width field.
    pub fn read<T: WebpPrim>(&mut self) -> Result<T, ParseError> {
        T::parse(&mut self.buf)
    }

    /// Read an 8-byte chunk header.
    pub fn read_header(&mut self) -> Result<ChunkHeader, ParseError> {
        self.read()
    }

    /// Copy `len` bytes out of the input.
    pub fn read_bytes(&mut self, len: u32) -> Result<Bytes, ParseError> {
        ensure_attach!(
            self.remaining() as u64 >= u64::from(len),
            ParseError::BufferUnderrun,
            format!("requested {len} bytes with {} remaining", self.remaining()),
        );
        Ok(self.buf.copy_to_bytes(len as usize))
    }

    /// Advance past `len` bytes without copying them.
    ///
    /// Skipping past the end of the input leaves the cursor at the end of the input.
    pub fn skip(&mut self, len: usize) {
        if len > self.remaining() {
            log::debug!(
                "skip of {len} bytes @ 0x{offset:08x} exceeds {remaining} remaining bytes",
                offset = self.offset(),
                remaining = self.remaining(),
            );
        }
        self.buf.advance(len.min(self.remaining()));
    }

    /// Skip the padding byte following the chunk described by `header`, if configured to and one is present.
    ///
    /// Returns whether a byte was skipped.
    pub fn skip_padding(&mut self, header: &ChunkHeader) -> bool {
        if !self.pad_odd_chunks || !header.padded() || !self.buf.has_remaining() {
            return false;
        }
        log::debug!("padding @ 0x{offset:08x} after `{name}` chunk", offset = self.offset(), name = header.name);
        self.buf.advance(1);
        true
    }

    /// Decode the payload of the chunk described by `header`, assuming the header has already been read.
    pub fn parse_chunk<T: ParseChunk>(&mut self, header: &ChunkHeader) -> Result<T, ParseError> {
        T::parse(self, header).while_parsing_chunk(header.name)
    }
}
