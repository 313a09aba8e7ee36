#![allow(missing_docs)]

use bytes::{Buf, BufMut};
use webpinspect_common::error::WhileParsingType;
use webpinspect_common::{ensure_attach, Result};

use super::{FourCC, ParseError, WebpPrim};

/// An 8-byte RIFF chunk header: a [`FourCC`] tag followed by a little-endian payload length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    /// The chunk tag.
    pub name: FourCC,
    /// The declared payload length, not including the header or any padding byte.
    pub len: u32,
}

macro_rules! chunk_type {
    ($($code:ident),+ $(,)?) => {
        /// Chunk tags recognized by the parser.
        pub mod chunk_type {
            use super::*;

            $(
                #[doc = concat!("The `", stringify!($code), "` chunk type.")]
                pub const $code: FourCC = FourCC::from_str(stringify!($code));
            )+
        }
    };
}

chunk_type!(ALPH, ANIM, ANMF, RIFF, VP8, VP8L, VP8X);

//
// ChunkHeader impls
//

impl ChunkHeader {
    /// Whether the chunk is followed by a padding byte, RIFF chunks being padded to an even length.
    pub fn padded(&self) -> bool {
        self.len % 2 == 1
    }
}

impl WebpPrim for ChunkHeader {
    const ENCODED_LEN: u32 = 8;

    fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        ensure_attach!(
            buf.remaining() >= Self::ENCODED_LEN as usize,
            ParseError::BufferUnderrun,
            WhileParsingType::new::<Self>()
        );
        let name = FourCC::parse(&mut buf);
        let len = buf.get_u32_le();
        Ok(Self { name, len })
    }

    fn put_buf<B: BufMut>(&self, mut buf: B) {
        self.name.put_buf(&mut buf);
        buf.put_u32_le(self.len);
    }
}
