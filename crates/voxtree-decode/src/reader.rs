//! Primitive reads over the `.vox` byte stream.
//!
//! The container is a flat sequence of tagged chunks. Every multi-byte
//! integer is little-endian; strings are length-prefixed UTF-8; attribute
//! dictionaries are a count followed by key/value string pairs.

use std::collections::HashMap;

use crate::error::{DecodeError, DecodeResult};

/// A string-to-string attribute dictionary, as stored in `DICT` payloads.
pub type Dict = HashMap<String, String>;

/// A chunk header: 4-byte tag plus content and children byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Four-character chunk tag (e.g. `b"SIZE"`).
    pub tag: [u8; 4],
    /// Number of content bytes following the header.
    pub content_size: u32,
    /// Number of child chunk bytes following the content.
    pub children_size: u32,
}

impl ChunkHeader {
    /// Total bytes spanned by this chunk after the header.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.content_size as usize + self.children_size as usize
    }
}

/// Forward-only cursor over an in-memory `.vox` document.
#[derive(Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes left in the stream.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// True when the stream is fully consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take `count` bytes, failing if fewer remain.
    fn take(&mut self, count: usize, context: &'static str) -> DecodeResult<&'a [u8]> {
        if self.remaining() < count {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(bytes)
    }

    /// Read exactly `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize, context: &'static str) -> DecodeResult<&'a [u8]> {
        self.take(count, context)
    }

    /// Skip `count` bytes, failing if fewer remain.
    pub fn skip(&mut self, count: usize, context: &'static str) -> DecodeResult<()> {
        self.take(count, context)?;
        Ok(())
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self, context: &'static str) -> DecodeResult<u32> {
        let bytes = self.take(4, context)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a length-prefixed string (u32 length, then that many bytes).
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected; attribute
    /// values never influence structural decoding.
    pub fn read_string(&mut self, context: &'static str) -> DecodeResult<String> {
        let length = self.read_u32(context)? as usize;
        let bytes = self.take(length, context)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read an attribute dictionary: u32 pair count, then key/value strings.
    pub fn read_dict(&mut self, context: &'static str) -> DecodeResult<Dict> {
        let count = self.read_u32(context)? as usize;
        let mut dict = Dict::with_capacity(count);
        for _ in 0..count {
            let key = self.read_string(context)?;
            let value = self.read_string(context)?;
            dict.insert(key, value);
        }
        Ok(dict)
    }

    /// Read a length-prefixed list of u32 ids.
    pub fn read_u32_list(&mut self, context: &'static str) -> DecodeResult<Vec<u32>> {
        let count = self.read_u32(context)? as usize;
        let mut list = Vec::with_capacity(count);
        for _ in 0..count {
            list.push(self.read_u32(context)?);
        }
        Ok(list)
    }

    /// Read a chunk header (tag, content size, children size).
    pub fn read_chunk_header(&mut self) -> DecodeResult<ChunkHeader> {
        let tag_bytes = self.take(4, "chunk tag")?;
        let tag = [tag_bytes[0], tag_bytes[1], tag_bytes[2], tag_bytes[3]];
        let content_size = self.read_u32("chunk content size")?;
        let children_size = self.read_u32("chunk children size")?;
        Ok(ChunkHeader {
            tag,
            content_size,
            children_size,
        })
    }
}
