//! Error types returned by the parsing API.

use std::fmt::{Debug, Display};

use derive_more::Display;
use webpinspect_common::error::ReportableError;
use webpinspect_common::parse::FourCC;
use webpinspect_common::{Result, ResultExt};

/// Error type returned by the WebP chunk parser.
///
/// Every error aborts the whole parse; no partial [`Document`](crate::Document) is ever returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A fixed-width read requested more bytes than remain in the input.
    ///
    /// This can occur either when the entire input is truncated or when a chunk size is incorrect.
    #[error("Buffer underrun")]
    BufferUnderrun,
    /// An `ANMF` frame's nested data did not contain a `VP8 ` or `VP8L` image bitstream chunk.
    #[error("Missing image bitstream in frame")]
    MissingBitstream,
}

pub(crate) trait ParseResultExt: ResultExt + Sized {
    #[track_caller]
    fn while_parsing_chunk(self, chunk_type: FourCC) -> Self {
        self.attach_printable(WhileParsingChunk(chunk_type))
    }

    #[track_caller]
    fn while_parsing_field<T>(self, chunk_type: FourCC, field_name: T) -> Self
    where
        T: Display + Debug + Send + Sync + 'static,
    {
        self.attach_printable(WhileParsingField(chunk_type, field_name))
    }
}

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "while parsing `{}` chunk", _0)]
pub(crate) struct WhileParsingChunk(pub(crate) FourCC);

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "while parsing `{}` chunk field `{}`", _0, _1)]
pub(crate) struct WhileParsingField<T>(pub(crate) FourCC, pub(crate) T);

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "declared payload of {} bytes is shorter than {} bytes of fixed fields", _0, _1)]
pub(crate) struct PayloadTooShort(pub(crate) u32, pub(crate) u32);

impl ReportableError for ParseError {
    #[cfg(feature = "error-detail")]
    type Stack = webpinspect_common::error::ReportStack;
    #[cfg(not(feature = "error-detail"))]
    type Stack = webpinspect_common::error::NullReportStack;
}

impl<T> ParseResultExt for Result<T, ParseError> {}
