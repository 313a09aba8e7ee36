#![allow(missing_docs)]

use std::fmt;

use bytes::BufMut;

use super::{Alpha, AnimationParameters, ExtendedFeatures, FourCC, Frame, ImageBitstream, ParsedChunk};

/// A decoded WebP chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Chunk {
    /// A `VP8 ` or `VP8L` chunk.
    ImageBitstream(ImageBitstream),
    /// A `VP8X` chunk.
    ExtendedFeatures(ExtendedFeatures),
    /// An `ANIM` chunk.
    AnimationParameters(AnimationParameters),
    /// An `ANMF` chunk.
    Frame(Frame),
    /// An `ALPH` chunk.
    ///
    /// The top-level parser does not produce this variant; `ALPH` chunks are only decoded inside frames.
    Alpha(Alpha),
}

//
// Chunk impls
//

impl Chunk {
    fn as_parsed(&self) -> &dyn ParsedChunk {
        match self {
            Self::ImageBitstream(chunk) => chunk,
            Self::ExtendedFeatures(chunk) => chunk,
            Self::AnimationParameters(chunk) => chunk,
            Self::Frame(chunk) => chunk,
            Self::Alpha(chunk) => chunk,
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_extended_features(&self) -> Option<&ExtendedFeatures> {
        match self {
            Self::ExtendedFeatures(vp8x) => Some(vp8x),
            _ => None,
        }
    }

    pub fn as_animation_parameters(&self) -> Option<&AnimationParameters> {
        match self {
            Self::AnimationParameters(anim) => Some(anim),
            _ => None,
        }
    }

    pub fn as_image_bitstream(&self) -> Option<&ImageBitstream> {
        match self {
            Self::ImageBitstream(bitstream) => Some(bitstream),
            _ => None,
        }
    }
}

impl ParsedChunk for Chunk {
    fn name(&self) -> FourCC {
        self.as_parsed().name()
    }

    fn encoded_len(&self) -> u32 {
        self.as_parsed().encoded_len()
    }

    fn put_buf(&self, buf: &mut dyn BufMut) {
        self.as_parsed().put_buf(buf)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageBitstream(chunk) => fmt::Display::fmt(chunk, f),
            Self::ExtendedFeatures(chunk) => fmt::Display::fmt(chunk, f),
            Self::AnimationParameters(chunk) => fmt::Display::fmt(chunk, f),
            Self::Frame(chunk) => fmt::Display::fmt(chunk, f),
            Self::Alpha(chunk) => fmt::Display::fmt(chunk, f),
        }
    }
}

macro_rules! chunk_from {
    ($($variant:ident),+ $(,)?) => {
        $(impl From<$variant> for Chunk {
            fn from(chunk: $variant) -> Self {
                Self::$variant(chunk)
            }
        })+
    };
}

chunk_from!(ImageBitstream, ExtendedFeatures, AnimationParameters, Frame, Alpha);
