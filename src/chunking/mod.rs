//! Document chunking for breaking extracted text into searchable passages.

mod recursive;

pub use recursive::{RecursiveChunker, DEFAULT_SEPARATORS};

use serde::{Deserialize, Serialize};

/// A passage of a source document.
///
/// `content` is always `text[start..end]` of the document it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// File name of the originating document.
    pub source: String,
    /// Position of this chunk within its document.
    pub index: usize,
    /// Text content of this chunk.
    pub content: String,
    /// Byte offset of the first character in the document text.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Chunk {
    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}
