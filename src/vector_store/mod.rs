//! Vector store abstraction for DocMind.
//!
//! Provides a trait-based interface for different vector database backends,
//! and [`VectorIndex`], which pairs a backend with an [`Embedder`](crate::embedding::Embedder).

mod index;
mod memory;
mod sqlite;

pub use index::{RetrievedChunk, VectorIndex, DEFAULT_TOP_K};
pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::chunking::Chunk;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk as persisted in the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Unique record ID.
    pub id: Uuid,
    /// File name of the originating document.
    pub source: String,
    /// Order of this chunk in its document.
    pub chunk_index: i64,
    /// Text content of this chunk.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this chunk was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl StoredChunk {
    /// Pair a chunk with its embedding.
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: chunk.source,
            chunk_index: chunk.index as i64,
            content: chunk.content,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched record.
    pub record: StoredChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Per-source summary of the index contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Source file name.
    pub source: String,
    /// Number of stored chunks.
    pub chunk_count: u32,
    /// Most recent insert for this source.
    pub last_indexed_at: DateTime<Utc>,
}

/// Restricts retrieval to chunks from named sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrievalFilter {
    /// Only chunks whose source equals this name.
    Source(String),
    /// Chunks from any of these sources.
    AnyOf(Vec<String>),
}

impl RetrievalFilter {
    /// Build a filter from a list of names. An empty list means no filter.
    pub fn from_sources(mut sources: Vec<String>) -> Option<Self> {
        match sources.len() {
            0 => None,
            1 => sources.pop().map(RetrievalFilter::Source),
            _ => Some(RetrievalFilter::AnyOf(sources)),
        }
    }

    /// The eligible source names.
    pub fn sources(&self) -> Vec<&str> {
        match self {
            RetrievalFilter::Source(s) => vec![s.as_str()],
            RetrievalFilter::AnyOf(list) => list.iter().map(String::as_str).collect(),
        }
    }

    /// Whether a chunk from `source` is eligible.
    pub fn matches(&self, source: &str) -> bool {
        match self {
            RetrievalFilter::Source(s) => s == source,
            RetrievalFilter::AnyOf(list) => list.iter().any(|s| s == source),
        }
    }
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Persist records atomically. Returns the number stored.
    async fn insert(&self, records: &[StoredChunk]) -> Result<usize>;

    /// The `limit` most similar eligible records, best first.
    ///
    /// Eligibility is decided before ranking, so a filter never causes fewer
    /// than `limit` results while more eligible records exist.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        filter: Option<&RetrievalFilter>,
    ) -> Result<Vec<SearchResult>>;

    /// List every source with its chunk count.
    async fn list_sources(&self) -> Result<Vec<SourceSummary>>;

    /// Get total chunk count.
    async fn chunk_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Sort by descending score and keep the best `limit`.
pub(crate) fn rank(mut results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}
