//! Types and traits for decoding individual WebP chunks.

mod alph;
mod anim;
mod anmf;
mod bits;
mod bitstream;
mod chunk;
pub mod error;
mod header;
mod integers;
mod vp8x;

use bytes::BufMut;
use webpinspect_common::Result;

pub use crate::reader::ChunkReader;

/// A chunk whose payload can be decoded from a [`ChunkReader`].
pub trait ParseChunk: Sized {
    /// Decode the payload of the chunk described by `header`, with `reader` positioned just after the header.
    fn parse(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, ParseError>;
}

/// A chunk value which can be written back out.
pub trait ParsedChunk {
    /// The chunk tag.
    fn name(&self) -> FourCC;

    /// The payload length written into the chunk header.
    fn encoded_len(&self) -> u32;

    /// Write the chunk payload.
    fn put_buf(&self, buf: &mut dyn BufMut);

    /// Write the chunk header followed by the (unpadded) payload.
    fn put_chunk(&self, mut buf: &mut dyn BufMut) {
        ChunkHeader { name: self.name(), len: self.encoded_len() }.put_buf(&mut buf);
        self.put_buf(buf);
    }
}

pub use alph::Alpha;
pub use anim::AnimationParameters;
pub use anmf::{AnmfFlags, Frame, FrameData};
pub use bits::extract_bits;
pub use bitstream::{BitstreamFormat, ImageBitstream};
pub use chunk::Chunk;
pub use error::ParseError;
pub use header::{chunk_type, ChunkHeader};
pub use integers::{EvenU24, OneBasedU24, UintLe, WebpPrim, U24};
pub use vp8x::{ExtendedFeatures, Vp8xFlags};

pub use webpinspect_common::parse::FourCC;
