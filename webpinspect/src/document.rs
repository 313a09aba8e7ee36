use std::slice;

use bytes::BufMut;

use crate::parse::{AnimationParameters, Chunk, ChunkHeader, ExtendedFeatures, Frame, ParsedChunk, WebpPrim};

/// The decoded chunks of a WebP file, in the order they were encountered.
///
/// Unrecognized chunks are not represented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    chunks: Box<[Chunk]>,
}

/// A builder accumulating chunks for a [`Document`].
#[derive(Clone, Debug, Default)]
pub struct DocumentBuilder {
    chunks: Vec<Chunk>,
}

//
// Document impls
//

impl Document {
    /// Construct a builder for `Document`.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// The decoded chunks, in encounter order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Iterate over the decoded chunks, in encounter order.
    pub fn iter(&self) -> slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    /// The number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether there are no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Unwrap this document, returning its chunks.
    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks.into_vec()
    }

    /// The first `VP8X` chunk, if any.
    pub fn extended_features(&self) -> Option<&ExtendedFeatures> {
        self.iter().find_map(Chunk::as_extended_features)
    }

    /// The first `ANIM` chunk, if any.
    pub fn animation_parameters(&self) -> Option<&AnimationParameters> {
        self.iter().find_map(Chunk::as_animation_parameters)
    }

    /// All `ANMF` frames, in order.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.iter().filter_map(Chunk::as_frame)
    }

    /// The sum of the encoded lengths of all chunks, headers included, without padding.
    pub fn encoded_len(&self) -> usize {
        self.iter().map(|chunk| (ChunkHeader::ENCODED_LEN + chunk.encoded_len()) as usize).sum()
    }

    /// Write every chunk, header and payload, in order.
    ///
    /// No padding is written after odd-length payloads, so the output reads back identically with the default
    /// [`Config`](crate::Config).
    ///
    /// # Panics
    ///
    /// Panics if a chunk holds a field value its encoding cannot represent, e.g. an odd frame offset or a canvas
    /// dimension above 2<sup>24</sup>.
    pub fn put_buf(&self, buf: &mut dyn BufMut) {
        for chunk in self.iter() {
            chunk.put_chunk(buf);
        }
    }

    /// Write every chunk to a new buffer. See [`put_buf`](Self::put_buf).
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.put_buf(&mut out);
        out
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Chunk;
    type IntoIter = slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Chunk> for Document {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        Self { chunks: iter.into_iter().collect() }
    }
}

//
// DocumentBuilder impls
//

impl DocumentBuilder {
    /// Append a chunk.
    pub fn push(&mut self, chunk: impl Into<Chunk>) -> &mut Self {
        self.chunks.push(chunk.into());
        self
    }

    /// The number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether there are no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Finalize the accumulated chunks into a [`Document`].
    pub fn build(self) -> Document {
        Document { chunks: self.chunks.into_boxed_slice() }
    }
}
