#![allow(missing_docs)]

use std::fmt;
use std::num::NonZeroU32;

use bytes::BufMut;
use webpinspect_common::{ensure_matches_attach, Result, ResultExt};

use crate::reader::ChunkReader;

use super::bits::extract_bits;
use super::chunk_type::{ALPH, ANMF};
use super::error::ParseResultExt;
use super::{
    Alpha, BitstreamFormat, ChunkHeader, EvenU24, FourCC, ImageBitstream, OneBasedU24, ParseChunk, ParseError,
    ParsedChunk, WebpPrim, U24,
};

/// An `ANMF` animation frame.
///
/// Writing a frame panics unless `x` and `y` are even and at most [`EvenU24::MAX`], `width` and `height` are at most
/// [`OneBasedU24::MAX`], `duration_ms` is at most [`U24::MAX`], and the disposal and blending methods are `0` or `1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Horizontal offset on the canvas; always even.
    pub x: u32,
    /// Vertical offset on the canvas; always even.
    pub y: u32,
    pub width: NonZeroU32,
    pub height: NonZeroU32,
    pub duration_ms: u32,
    /// `1` if the frame's area is disposed to the background color before the next frame.
    pub disposal_method: u8,
    /// `1` if the frame overwrites the canvas instead of being alpha-blended onto it.
    pub blending_method: u8,
    pub data: FrameData,
}

/// The chunks nested in an `ANMF` frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameData {
    pub alpha: Option<Alpha>,
    pub bitstream: ImageBitstream,
}

bitflags::bitflags! {
    /// Bits of the `ANMF` flags byte. The high 6 bits are reserved.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct AnmfFlags: u8 {
        const NO_BLEND = 0b0000_0010;
        const DISPOSE_BACKGROUND = 0b0000_0001;
    }
}

//
// Frame impls
//

impl Frame {
    /// The length of the fixed frame header preceding the nested frame data.
    pub const HEADER_LEN: u32 = EvenU24::ENCODED_LEN
        + EvenU24::ENCODED_LEN
        + OneBasedU24::ENCODED_LEN
        + OneBasedU24::ENCODED_LEN
        + U24::ENCODED_LEN
        + u8::ENCODED_LEN;

    pub fn flags(&self) -> AnmfFlags {
        let mut flags = AnmfFlags::empty();
        flags.set(AnmfFlags::DISPOSE_BACKGROUND, self.disposal_method != 0);
        flags.set(AnmfFlags::NO_BLEND, self.blending_method != 0);
        flags
    }
}

impl ParseChunk for Frame {
    fn parse(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, ParseError> {
        let name = header.name;
        let x = reader.read::<EvenU24>().while_parsing_field(name, "x")?;
        let y = reader.read::<EvenU24>().while_parsing_field(name, "y")?;
        let width = reader.read::<OneBasedU24>().while_parsing_field(name, "width")?;
        let height = reader.read::<OneBasedU24>().while_parsing_field(name, "height")?;
        let duration = reader.read::<U24>().while_parsing_field(name, "duration")?;
        let flags = reader.read::<u8>().while_parsing_field(name, "flags")?;

        let budget = i64::from(header.len) - i64::from(Self::HEADER_LEN);
        let data = FrameData::parse(reader, budget)?;

        Ok(Self {
            x: x.get(),
            y: y.get(),
            width: width.get(),
            height: height.get(),
            duration_ms: duration.get(),
            disposal_method: extract_bits(flags, &[0]),
            blending_method: extract_bits(flags, &[1]) >> 1,
            data,
        })
    }
}

impl ParsedChunk for Frame {
    fn name(&self) -> FourCC {
        ANMF
    }

    fn encoded_len(&self) -> u32 {
        Self::HEADER_LEN + self.data.encoded_len()
    }

    fn put_buf(&self, mut buf: &mut dyn BufMut) {
        assert!(self.disposal_method <= 1, "disposal method {} does not fit in 1 bit", self.disposal_method);
        assert!(self.blending_method <= 1, "blending method {} does not fit in 1 bit", self.blending_method);
        EvenU24::new(self.x).put_buf(&mut buf);
        EvenU24::new(self.y).put_buf(&mut buf);
        OneBasedU24::new(self.width).put_buf(&mut buf);
        OneBasedU24::new(self.height).put_buf(&mut buf);
        U24::new(self.duration_ms).put_buf(&mut buf);
        self.flags().bits().put_buf(&mut buf);
        self.data.put_buf(buf);
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { x, y, width, height, duration_ms, disposal_method, blending_method, .. } = self;
        write!(
            f,
            "{width}x{height} @ ({x}, {y}), {duration_ms} ms, disposal {disposal_method}, blending {blending_method}",
        )
    }
}

//
// FrameData impls
//

impl FrameData {
    /// Decode the chunks nested in a frame, consuming at most `budget` bytes as declared by their headers.
    ///
    /// A trailing fragment too short to hold a chunk tag is skipped. Later `ALPH` or bitstream chunks replace earlier
    /// ones.
    pub fn parse(reader: &mut ChunkReader<'_>, mut budget: i64) -> Result<Self, ParseError> {
        let mut alpha = None;
        let mut bitstream = None;

        while budget > 0 {
            if budget < i64::from(FourCC::ENCODED_LEN) {
                log::debug!("{budget} byte fragment @ 0x{offset:08x}: skipped", offset = reader.offset());
                reader.skip(budget as usize);
                break;
            }

            let offset = reader.offset();
            let header = reader.read_header().attach_printable("while parsing frame data")?;
            let ChunkHeader { name, len } = header;
            budget -= i64::from(ChunkHeader::ENCODED_LEN) + i64::from(len);

            match (name, BitstreamFormat::from_name(name)) {
                (ALPH, _) => {
                    let read_alpha: Alpha = reader.parse_chunk(&header)?;
                    if alpha.is_some() {
                        log::debug!("{name} @ 0x{offset:08x}: replaces an earlier `{name}` chunk");
                    }
                    log::debug!("{name} @ 0x{offset:08x}: {len} bytes, {read_alpha}");
                    alpha = Some(read_alpha);
                }
                (_, Some(format)) => {
                    let read_bitstream = ImageBitstream::parse(reader, format, &header).while_parsing_chunk(name)?;
                    if bitstream.is_some() {
                        log::debug!("{name} @ 0x{offset:08x}: replaces an earlier bitstream chunk");
                    }
                    log::debug!("{name} @ 0x{offset:08x}: {len} bytes, {read_bitstream}");
                    bitstream = Some(read_bitstream);
                }
                _ => {
                    log::debug!("{name} @ 0x{offset:08x}: {len} bytes, skipped");
                    reader.skip(len as usize);
                }
            }

            if reader.skip_padding(&header) {
                budget -= 1;
            }
        }

        ensure_matches_attach!(
            bitstream,
            Some(bitstream),
            ParseError::MissingBitstream,
            "no `VP8 ` or `VP8L` chunk in frame data",
        );
        Ok(Self { alpha, bitstream })
    }

    pub fn encoded_len(&self) -> u32 {
        let alpha_len = self.alpha.as_ref().map_or(0, |alpha| ChunkHeader::ENCODED_LEN + alpha.encoded_len());
        alpha_len + ChunkHeader::ENCODED_LEN + self.bitstream.encoded_len()
    }

    pub fn put_buf(&self, buf: &mut dyn BufMut) {
        if let Some(alpha) = &self.alpha {
            alpha.put_chunk(buf);
        }
        self.bitstream.put_chunk(buf);
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use crate::util::test::{test_alph, test_anmf, write_test_anmf, write_test_chunk};
    use crate::Config;

    use super::super::chunk_type::{VP8, VP8L};
    use super::*;

    fn parse_frame(data: &[u8]) -> Result<Frame, ParseError> {
        parse_frame_with_config(data, &Config::default())
    }

    fn parse_frame_with_config(data: &[u8], config: &Config) -> Result<Frame, ParseError> {
        let mut reader = ChunkReader::with_config(data, config);
        let header = reader.read_header().unwrap();
        assert_eq!(header.name, ANMF);
        reader.parse_chunk(&header)
    }

    fn frame_flags(flags: u8) -> Frame {
        parse_frame(&test_anmf().flags(flags).build_bytes()).unwrap()
    }

    #[test]
    fn header_fields() {
        let data = test_anmf().x(3).y(5).width(9).height(4).duration(1000).build_bytes();
        let frame = parse_frame(&data).unwrap();
        assert_eq!((frame.x, frame.y), (6, 10));
        assert_eq!((frame.width.get(), frame.height.get()), (10, 5));
        assert_eq!(frame.duration_ms, 1000);
    }

    #[test]
    fn dispose_only() {
        let frame = frame_flags(0b0000_0001);
        assert_eq!((frame.disposal_method, frame.blending_method), (1, 0));
    }

    #[test]
    fn blend_only() {
        let frame = frame_flags(0b0000_0010);
        assert_eq!((frame.disposal_method, frame.blending_method), (0, 1));
    }

    #[test]
    fn dispose_and_blend() {
        let frame = frame_flags(0b0000_0011);
        assert_eq!((frame.disposal_method, frame.blending_method), (1, 1));
    }

    #[test]
    fn lossless_without_alpha() {
        let vp8l_data = b"\x2f\x00\x00\x00\x00\x88\x88\x08".to_vec();
        let data = test_anmf().chunks([VP8L]).vp8l_data(vp8l_data.clone()).build_bytes();
        let frame = parse_frame(&data).unwrap();
        assert_eq!(frame.data.alpha, None);
        assert_eq!(frame.data.bitstream.format, BitstreamFormat::Vp8l);
        assert_eq!(frame.data.bitstream.data, vp8l_data);
    }

    #[test]
    fn lossy_with_alpha() {
        let alph = test_alph().flags(0b0000_0101).clone();
        let data = test_anmf().chunks([ALPH, VP8]).alph(alph).build_bytes();
        let frame = parse_frame(&data).unwrap();
        let alpha = frame.data.alpha.unwrap();
        assert_eq!((alpha.compression_method, alpha.filtering_method), (1, 1));
        assert_eq!(frame.data.bitstream.format, BitstreamFormat::Vp8);
    }

    #[test]
    fn alpha_only() {
        let data = test_anmf().chunks([ALPH]).build_bytes();
        let err = parse_frame(&data).unwrap_err();
        assert_matches!(err.get_ref(), ParseError::MissingBitstream, "{err:?}");
    }

    #[test]
    fn empty_frame_data() {
        let data = test_anmf().chunks(Vec::<FourCC>::new()).build_bytes();
        let err = parse_frame(&data).unwrap_err();
        assert_matches!(err.get_ref(), ParseError::MissingBitstream, "{err:?}");
    }

    #[test]
    fn short_declared_len() {
        let mut data = vec![];
        write_test_anmf(&mut data, 0, 0, 0, 0, 0, 0, &[]);
        data[4] = 4;
        let err = parse_frame(&data).unwrap_err();
        assert_matches!(err.get_ref(), ParseError::MissingBitstream, "{err:?}");
    }

    #[test]
    fn later_alpha_wins() {
        let mut frame_data = vec![];
        write_test_chunk(&mut frame_data, b"ALPH", b"\x00first");
        write_test_chunk(&mut frame_data, b"ALPH", b"\x01later");
        write_test_chunk(&mut frame_data, b"VP8 ", b"vp8 data");
        let mut data = vec![];
        write_test_anmf(&mut data, 0, 0, 0, 0, 0, 0, &frame_data);
        let alpha = parse_frame(&data).unwrap().data.alpha.unwrap();
        assert_eq!(alpha.compression_method, 1);
        assert_eq!(alpha.bitstream, &b"later"[..]);
    }

    #[test]
    fn unknown_nested_chunk_skipped() {
        let mut frame_data = vec![];
        write_test_chunk(&mut frame_data, b"TeSt", b"unknown!");
        write_test_chunk(&mut frame_data, b"VP8L", b"lossless");
        let mut data = vec![];
        write_test_anmf(&mut data, 0, 0, 0, 0, 0, 0, &frame_data);
        let frame = parse_frame(&data).unwrap();
        assert_eq!(frame.data.bitstream.data, &b"lossless"[..]);
    }

    #[test]
    fn trailing_fragment_skipped() {
        let mut frame_data = vec![];
        write_test_chunk(&mut frame_data, b"VP8L", b"lossless");
        frame_data.extend_from_slice(b"abc");
        let mut data = vec![];
        write_test_anmf(&mut data, 0, 0, 0, 0, 0, 0, &frame_data);
        data.extend_from_slice(b"next");

        let mut reader = ChunkReader::new(&data);
        let header = reader.read_header().unwrap();
        let frame: Frame = reader.parse_chunk(&header).unwrap();
        assert_eq!(frame.data.bitstream.data, &b"lossless"[..]);
        assert_eq!(reader.remaining(), 4);
    }

    #[test]
    fn truncated_frame_header() {
        let err = parse_frame(b"ANMF\x10\0\0\0\0\0\0\0\0").unwrap_err();
        assert_matches!(err.get_ref(), ParseError::BufferUnderrun, "{err:?}");
    }

    #[test]
    fn odd_nested_chunk_padding() {
        let mut frame_data = vec![];
        write_test_chunk(&mut frame_data, b"ALPH", b"\x00ab");
        write_test_chunk(&mut frame_data, b"VP8L", b"lossless");
        let mut data = vec![];
        write_test_anmf(&mut data, 0, 0, 0, 0, 0, 0, &frame_data);

        let config = Config::builder().pad_odd_chunks(true).build();
        let frame = parse_frame_with_config(&data, &config).unwrap();
        assert_eq!(frame.data.alpha.unwrap().bitstream, &b"ab"[..]);
        assert_eq!(frame.data.bitstream.data, &b"lossless"[..]);
    }

    fn test_frame() -> Frame {
        parse_frame(&test_anmf().build_bytes()).unwrap()
    }

    #[test]
    #[should_panic]
    fn write_odd_offset() {
        let frame = Frame { x: 3, ..test_frame() };
        frame.put_chunk(&mut vec![]);
    }

    #[test]
    #[should_panic]
    fn write_oversized_width() {
        let frame = Frame { width: NonZeroU32::new((1 << 24) + 5).unwrap(), ..test_frame() };
        frame.put_chunk(&mut vec![]);
    }

    #[test]
    #[should_panic]
    fn write_oversized_duration() {
        let frame = Frame { duration_ms: 1 << 24, ..test_frame() };
        frame.put_chunk(&mut vec![]);
    }

    #[test]
    #[should_panic]
    fn write_wide_disposal_method() {
        let frame = Frame { disposal_method: 2, ..test_frame() };
        frame.put_chunk(&mut vec![]);
    }

    #[test]
    fn write_largest_fields() {
        let frame = Frame {
            x: EvenU24::MAX,
            y: EvenU24::MAX,
            width: NonZeroU32::new(OneBasedU24::MAX).unwrap(),
            height: NonZeroU32::new(OneBasedU24::MAX).unwrap(),
            duration_ms: U24::MAX,
            ..test_frame()
        };
        let mut data = vec![];
        frame.put_chunk(&mut data);
        assert_eq!(parse_frame(&data).unwrap(), frame);
    }

    #[test]
    fn alpha_after_bitstream_kept() {
        let data = test_anmf().chunks([VP8L, ALPH]).build_bytes();
        let frame = parse_frame(&data).unwrap();
        assert!(frame.data.alpha.is_some());
        assert_eq!(frame.data.bitstream.format, BitstreamFormat::Vp8l);
    }

    #[test]
    fn nested_header_crosses_frame_end() {
        let mut data = vec![];
        write_test_anmf(&mut data, 0, 0, 0, 0, 0, 0, b"VP8L\0");
        data.extend_from_slice(b"\0\0\0next");

        let mut reader = ChunkReader::new(&data);
        let header = reader.read_header().unwrap();
        let frame: Frame = reader.parse_chunk(&header).unwrap();
        assert!(frame.data.bitstream.data.is_empty());
        assert_eq!(reader.remaining(), 4);
    }

    #[test]
    fn nested_header_crosses_input_end() {
        let mut data = vec![];
        write_test_anmf(&mut data, 0, 0, 0, 0, 0, 0, b"VP8L\0\0");
        let err = parse_frame(&data).unwrap_err();
        assert_matches!(err.get_ref(), ParseError::BufferUnderrun, "{err:?}");
    }

    #[test]
    fn round_trip() {
        let frame = Frame {
            x: 4,
            y: 2,
            width: NonZeroU32::new(5).unwrap(),
            height: NonZeroU32::new(7).unwrap(),
            duration_ms: 2000,
            disposal_method: 1,
            blending_method: 0,
            data: FrameData {
                alpha: Some(Alpha {
                    compression_method: 0,
                    filtering_method: 2,
                    preprocessing: 0,
                    bitstream: bytes::Bytes::from_static(b"\x01\x02"),
                }),
                bitstream: ImageBitstream::new(BitstreamFormat::Vp8, &b"lossy data"[..]),
            },
        };
        let mut data = vec![];
        frame.put_chunk(&mut data);
        assert_eq!(data.len() as u32, ChunkHeader::ENCODED_LEN + frame.encoded_len());
        assert_eq!(parse_frame(&data).unwrap(), frame);
    }
}
