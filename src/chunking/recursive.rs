//! Recursive separator-based chunking with overlap.
//!
//! Text is cut along the first separator (in preference order) that occurs in
//! an oversized span, recursing into the remaining separators for pieces that
//! are still too long, and finally cutting on raw character boundaries. The
//! resulting pieces tile the text exactly and are merged greedily into chunks.

use super::Chunk;
use crate::config::ChunkingSettings;
use crate::error::{DocmindError, Result};
use std::ops::Range;
use tracing::debug;

/// Paragraph break, line break, sentence endings, word boundary, then raw characters.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "? ", "! ", " ", ""];

/// Splits text into overlapping chunks of bounded character length.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveChunker {
    /// Create a chunker. `chunk_overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DocmindError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(DocmindError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Build a chunker from configuration.
    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        Ok(Self::new(settings.chunk_size, settings.chunk_overlap)?
            .with_separators(settings.separators.clone()))
    }

    /// Replace the separator preference list.
    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks tagged with `source`.
    pub fn chunk(&self, text: &str, source: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Pieces leave room for the overlap carried into the next chunk.
        let piece_limit = self.chunk_size - self.chunk_overlap;
        let mut pieces = Vec::new();
        split_pieces(text, 0..text.len(), &self.separators, piece_limit, &mut pieces);
        let lens: Vec<usize> = pieces.iter().map(|r| char_len(&text[r.clone()])).collect();

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut end = 0;
        let mut len = 0;
        let mut i = 0;

        while i < pieces.len() {
            while i < pieces.len() && len + lens[i] <= self.chunk_size {
                len += lens[i];
                end = pieces[i].end;
                i += 1;
            }

            chunks.push(Chunk {
                source: source.to_string(),
                index: chunks.len(),
                content: text[start..end].to_string(),
                start,
                end,
            });

            if i < pieces.len() {
                let (next_start, overlap_len) = self.next_start(text, &pieces, &lens, start, end, i);
                start = next_start;
                len = overlap_len;
            }
        }

        debug!("Split {} into {} chunks", source, chunks.len());
        chunks
    }

    /// Where the chunk after `start..end` begins, and how many characters it shares.
    fn next_start(
        &self,
        text: &str,
        pieces: &[Range<usize>],
        lens: &[usize],
        start: usize,
        end: usize,
        next_piece: usize,
    ) -> (usize, usize) {
        if self.chunk_overlap == 0 {
            return (end, 0);
        }

        let target = text[..end]
            .char_indices()
            .rev()
            .nth(self.chunk_overlap - 1)
            .map(|(pos, _)| pos)
            .unwrap_or(start);

        // Prefer the latest piece boundary at or before the target.
        let boundary = pieces[..next_piece]
            .iter()
            .rev()
            .map(|p| p.start)
            .find(|&b| b > start && b <= target);

        if let Some(b) = boundary {
            let overlap_len = char_len(&text[b..end]);
            if overlap_len + lens[next_piece] <= self.chunk_size {
                return (b, overlap_len);
            }
        }

        (target, char_len(&text[target..end]))
    }
}

/// Recursively cut `range` until every piece is at most `limit` characters.
fn split_pieces(
    text: &str,
    range: Range<usize>,
    separators: &[String],
    limit: usize,
    out: &mut Vec<Range<usize>>,
) {
    let span = &text[range.clone()];
    if char_len(span) <= limit {
        out.push(range);
        return;
    }

    let mut remaining = separators;
    while let Some((sep, rest)) = remaining.split_first() {
        if !sep.is_empty() && span.contains(sep.as_str()) {
            let mut piece_start = range.start;
            for (pos, _) in span.match_indices(sep.as_str()) {
                // Separator stays with the piece it terminates.
                let piece_end = range.start + pos + sep.len();
                split_pieces(text, piece_start..piece_end, rest, limit, out);
                piece_start = piece_end;
            }
            if piece_start < range.end {
                split_pieces(text, piece_start..range.end, rest, limit, out);
            }
            return;
        }
        remaining = rest;
    }

    hard_split(text, range, limit, out);
}

/// Cut on character boundaries every `limit` characters.
fn hard_split(text: &str, range: Range<usize>, limit: usize, out: &mut Vec<Range<usize>>) {
    let mut piece_start = range.start;
    let mut count = 0;
    for (pos, _) in text[range.clone()].char_indices() {
        if count == limit {
            out.push(piece_start..range.start + pos);
            piece_start = range.start + pos;
            count = 0;
        }
        count += 1;
    }
    if piece_start < range.end {
        out.push(piece_start..range.end);
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
