#![allow(missing_docs)]

use std::fmt;
use std::num::NonZeroU32;

use bytes::BufMut;
use webpinspect_common::Result;

use crate::reader::ChunkReader;

use super::bits::extract_bits;
use super::chunk_type::VP8X;
use super::error::ParseResultExt;
use super::{ChunkHeader, FourCC, OneBasedU24, ParseChunk, ParseError, ParsedChunk, WebpPrim};

/// The `VP8X` extended features header.
///
/// Writing the header panics if a canvas dimension exceeds [`OneBasedU24::MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtendedFeatures {
    pub has_animation: bool,
    pub has_xmp_metadata: bool,
    pub has_exif_metadata: bool,
    pub has_alpha: bool,
    pub has_icc_profile: bool,
    pub canvas_width: NonZeroU32,
    pub canvas_height: NonZeroU32,
}

bitflags::bitflags! {
    /// Bit positions of the `VP8X` feature flags. The high 24 bits are reserved.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Vp8xFlags: u32 {
        const HAS_ICCP_CHUNK = 0b0010_0000;
        const HAS_ALPH_CHUNK = 0b0001_0000;
        const HAS_EXIF_CHUNK = 0b0000_1000;
        const HAS_XMP_CHUNK = 0b0000_0100;
        const IS_ANIMATED = 0b0000_0010;
    }
}

//
// ExtendedFeatures impls
//

impl ExtendedFeatures {
    /// The fixed payload length, read regardless of the declared chunk length.
    pub const ENCODED_LEN: u32 = u32::ENCODED_LEN + OneBasedU24::ENCODED_LEN + OneBasedU24::ENCODED_LEN;

    pub fn flags(&self) -> Vp8xFlags {
        let mut flags = Vp8xFlags::empty();
        flags.set(Vp8xFlags::HAS_ICCP_CHUNK, self.has_icc_profile);
        flags.set(Vp8xFlags::HAS_ALPH_CHUNK, self.has_alpha);
        flags.set(Vp8xFlags::HAS_EXIF_CHUNK, self.has_exif_metadata);
        flags.set(Vp8xFlags::HAS_XMP_CHUNK, self.has_xmp_metadata);
        flags.set(Vp8xFlags::IS_ANIMATED, self.has_animation);
        flags
    }
}

impl ParseChunk for ExtendedFeatures {
    fn parse(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, ParseError> {
        let name = header.name;
        if header.len != Self::ENCODED_LEN {
            log::debug!("{name} declares {len} bytes; reading {} bytes", Self::ENCODED_LEN, len = header.len);
        }

        let flags = reader.read::<u32>().while_parsing_field(name, "flags")?;
        let canvas_width = reader.read::<OneBasedU24>().while_parsing_field(name, "canvas_width")?;
        let canvas_height = reader.read::<OneBasedU24>().while_parsing_field(name, "canvas_height")?;

        Ok(Self {
            has_animation: extract_bits(flags, &[1]) != 0,
            has_xmp_metadata: extract_bits(flags, &[2]) != 0,
            has_exif_metadata: extract_bits(flags, &[3]) != 0,
            has_alpha: extract_bits(flags, &[4]) != 0,
            has_icc_profile: extract_bits(flags, &[5]) != 0,
            canvas_width: canvas_width.get(),
            canvas_height: canvas_height.get(),
        })
    }
}

impl ParsedChunk for ExtendedFeatures {
    fn name(&self) -> FourCC {
        VP8X
    }

    fn encoded_len(&self) -> u32 {
        Self::ENCODED_LEN
    }

    fn put_buf(&self, mut buf: &mut dyn BufMut) {
        self.flags().bits().put_buf(&mut buf);
        OneBasedU24::new(self.canvas_width).put_buf(&mut buf);
        OneBasedU24::new(self.canvas_height).put_buf(&mut buf);
    }
}

impl fmt::Display for ExtendedFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { canvas_width, canvas_height, .. } = self;
        write!(f, "{canvas_width}x{canvas_height} canvas, flags {:06b}", self.flags().bits())
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    fn parse_payload(payload: &[u8]) -> Result<ExtendedFeatures, ParseError> {
        let mut reader = ChunkReader::new(payload);
        reader.parse_chunk(&ChunkHeader { name: VP8X, len: payload.len() as u32 })
    }

    #[test]
    fn animated_5x5() {
        let vp8x = parse_payload(b"\x02\0\0\0\x04\0\0\x04\0\0").unwrap();
        assert!(vp8x.has_animation);
        assert!(!vp8x.has_alpha && !vp8x.has_icc_profile && !vp8x.has_exif_metadata && !vp8x.has_xmp_metadata);
        assert_eq!((vp8x.canvas_width.get(), vp8x.canvas_height.get()), (5, 5));
    }

    #[test]
    fn each_flag() {
        let flags = |byte: u8| parse_payload(&[byte, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert!(flags(0b0000_0100).has_xmp_metadata);
        assert!(flags(0b0000_1000).has_exif_metadata);
        assert!(flags(0b0001_0000).has_alpha);
        assert!(flags(0b0010_0000).has_icc_profile);
        assert_eq!(flags(0b0000_0001), flags(0));
    }

    #[test]
    fn max_canvas() {
        let vp8x = parse_payload(b"\0\0\0\0\xff\xff\xff\xff\xff\xff").unwrap();
        assert_eq!((vp8x.canvas_width.get(), vp8x.canvas_height.get()), (1 << 24, 1 << 24));
    }

    #[test]
    fn canvas_round_trip() {
        for (width, height) in [(1, 1), (1, 1 << 24), (1 << 24, 2), (4000, 3000)] {
            let vp8x = ExtendedFeatures {
                has_animation: false,
                has_xmp_metadata: true,
                has_exif_metadata: false,
                has_alpha: true,
                has_icc_profile: false,
                canvas_width: NonZeroU32::new(width).unwrap(),
                canvas_height: NonZeroU32::new(height).unwrap(),
            };
            let mut payload = vec![];
            vp8x.put_buf(&mut payload);
            assert_eq!(payload.len(), ExtendedFeatures::ENCODED_LEN as usize);
            assert_eq!(parse_payload(&payload).unwrap(), vp8x);
        }
    }

    #[test]
    #[should_panic]
    fn write_oversized_canvas() {
        let vp8x = ExtendedFeatures {
            canvas_width: NonZeroU32::new((1 << 24) + 1).unwrap(),
            ..parse_payload(b"\0\0\0\0\0\0\0\0\0\0").unwrap()
        };
        vp8x.put_buf(&mut vec![]);
    }

    #[test]
    fn declared_len_ignored() {
        let mut reader = ChunkReader::new(b"\x10\0\0\0\0\0\0\0\0\0trailing");
        let vp8x: ExtendedFeatures = reader.parse_chunk(&ChunkHeader { name: VP8X, len: 18 }).unwrap();
        assert!(vp8x.has_alpha);
        assert_eq!(reader.remaining(), 8);
    }

    #[test]
    fn truncated() {
        let err = parse_payload(b"\0\0\0\0\0\0\0\0\0").unwrap_err();
        assert_matches!(err.get_ref(), ParseError::BufferUnderrun, "{err:?}");
    }
}
