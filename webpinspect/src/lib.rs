#![warn(missing_docs)]

//! `webpinspect` is a WebP chunk-level parser.
//!
//! The parser walks the RIFF chunk stream of a WebP file and decodes every recognized chunk into a typed [`Document`]:
//! extended features (`VP8X`), animation parameters (`ANIM`), animation frames (`ANMF`, with their nested `ALPH` and
//! image bitstream chunks) and raw `VP8 `/`VP8L` image bitstreams. Image bitstreams are copied verbatim and never
//! decoded into pixels. Unrecognized chunks are skipped.
//!
//! # Usage
//!
//! The main entry point is [`parse`](fn@parse), which takes the chunk stream as a fully resident byte slice,
//! positioned at the first chunk header. Any outer `RIFF....WEBP` file header must be validated and stripped by the
//! caller.
//!
//! ```
//! let example_input = b"VP8L\x08\0\0\0\x2f\0\0\0\0\x88\x88\x08";
//! let document = webpinspect::parse(example_input)?;
//! assert_eq!(document.len(), 1);
//! # Ok::<(), webpinspect::Error>(())
//! ```
//!
//! Every chunk value can also be written back out, see [`Document::to_vec`].
//!
//! The [`parse`](mod@parse) module also contains a less stable API which can be used to decode individual WebP chunk
//! types.

pub mod parse;
mod document;
mod reader;

use derive_builder::Builder;
use webpinspect_common::ResultExt;

use crate::parse::chunk_type::{ANIM, ANMF, VP8X};
use crate::parse::error::ParseResultExt;
use crate::parse::{
    AnimationParameters, BitstreamFormat, Chunk, ChunkHeader, ExtendedFeatures, FourCC, Frame, ImageBitstream,
    ParseError,
};
use crate::reader::ChunkReader;

//
// public types
//

/// Error type returned by `webpinspect`.
pub type Error = Report<ParseError>;

#[derive(Builder, Clone, Debug)]
#[builder(build_fn(name = "try_build"))]
/// Configuration for the WebP chunk parser.
pub struct Config {
    /// Whether to skip the padding byte which follows a chunk with an odd declared payload length.
    ///
    /// The default is `false`, in which case the byte following an odd-length payload is read as the start of the next
    /// chunk header.
    #[builder(default)]
    pub pad_odd_chunks: bool,
}

pub use document::{Document, DocumentBuilder};
pub use webpinspect_common::Report;

//
// public functions
//

/// Parse a WebP chunk stream.
///
/// See the [module-level documentation](self) for usage examples.
///
/// # Errors
///
/// If a recognized chunk is truncated, or an animation frame lacks an image bitstream, an [`Error`] is returned and
/// no partial [`Document`] is produced.
pub fn parse(input: &[u8]) -> Result<Document, Error> {
    parse_with_config(input, &Config::default())
}

/// Parse a WebP chunk stream, with the given [`Config`].
///
/// # Errors
///
/// If a recognized chunk is truncated, or an animation frame lacks an image bitstream, an [`Error`] is returned and
/// no partial [`Document`] is produced.
pub fn parse_with_config(input: &[u8], config: &Config) -> Result<Document, Error> {
    let mut reader = ChunkReader::with_config(input, config);
    let mut document = Document::builder();

    while reader.remaining() >= FourCC::ENCODED_LEN as usize {
        let offset = reader.offset();
        let header = reader.read_header().attach_printable("while parsing chunk header")?;
        let ChunkHeader { name, len } = header;

        let chunk: Chunk = match (name, BitstreamFormat::from_name(name)) {
            (_, Some(format)) => ImageBitstream::parse(&mut reader, format, &header)
                .while_parsing_chunk(name)?
                .into(),
            (VP8X, _) => reader.parse_chunk::<ExtendedFeatures>(&header)?.into(),
            (ANIM, _) => reader.parse_chunk::<AnimationParameters>(&header)?.into(),
            (ANMF, _) => reader.parse_chunk::<Frame>(&header)?.into(),
            _ => {
                if len as usize > reader.remaining() {
                    log::info!(
                        "{name} @ 0x{offset:08x}: {len} bytes, exceeds {remaining} remaining bytes",
                        remaining = reader.remaining(),
                    );
                    break;
                }
                reader.skip(len as usize);
                log::info!("{name} @ 0x{offset:08x}: {len} bytes, skipped");
                reader.skip_padding(&header);
                continue;
            }
        };

        log::info!("{name} @ 0x{offset:08x}: {len} bytes, {chunk}");
        reader.skip_padding(&header);
        document.push(chunk);
    }

    if reader.remaining() != 0 {
        log::debug!("{} trailing bytes @ 0x{:08x}: ignored", reader.remaining(), reader.offset());
    }

    Ok(document.build())
}

//
// Config impls
//

impl Config {
    /// Construct a builder for `Config`.
    ///
    /// See the documentation for [`ConfigBuilder`].
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

//
// ConfigBuilder impls
//

impl ConfigBuilder {
    /// Build a new [`Config`].
    pub fn build(&self) -> Config {
        self.try_build().unwrap()
    }
}

#[cfg(doctest)]
#[doc = include_str!("../../README.md")]
pub mod readme {}
