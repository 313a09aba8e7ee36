#![allow(missing_docs)]

use std::fmt;

use bytes::BufMut;
use webpinspect_common::Result;

use crate::reader::ChunkReader;

use super::chunk_type::ANIM;
use super::error::ParseResultExt;
use super::{ChunkHeader, FourCC, ParseChunk, ParseError, ParsedChunk, WebpPrim};

/// The `ANIM` global animation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationParameters {
    /// The packed background color, with the bit pattern of the on-disk field preserved.
    pub background_color: i32,
    /// The number of times to loop the animation, `0` meaning forever.
    pub loop_count: u16,
}

//
// AnimationParameters impls
//

impl AnimationParameters {
    /// The fixed payload length, read regardless of the declared chunk length.
    pub const ENCODED_LEN: u32 = i32::ENCODED_LEN + u16::ENCODED_LEN;

    /// The background color as an unsigned packed integer.
    pub fn background_color_bits(&self) -> u32 {
        self.background_color as u32
    }
}

impl ParseChunk for AnimationParameters {
    fn parse(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, ParseError> {
        let background_color = reader.read::<i32>().while_parsing_field(header.name, "background_color")?;
        let loop_count = reader.read::<u16>().while_parsing_field(header.name, "loop_count")?;
        Ok(Self { background_color, loop_count })
    }
}

impl ParsedChunk for AnimationParameters {
    fn name(&self) -> FourCC {
        ANIM
    }

    fn encoded_len(&self) -> u32 {
        Self::ENCODED_LEN
    }

    fn put_buf(&self, mut buf: &mut dyn BufMut) {
        let Self { background_color, loop_count } = self;
        background_color.put_buf(&mut buf);
        loop_count.put_buf(&mut buf);
    }
}

impl fmt::Display for AnimationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "background 0x{:08x}, loop count {}", self.background_color_bits(), self.loop_count)
    }
}
