//! In-memory vector store implementation.
//!
//! Useful for testing and one-off sessions; nothing survives the process.

use super::{cosine_similarity, rank, RetrievalFilter, SearchResult, SourceSummary, StoredChunk, VectorStore};
use crate::error::{DocmindError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    records: RwLock<Vec<StoredChunk>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> DocmindError {
        DocmindError::VectorStore(format!("Failed to acquire lock: {}", e))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn insert(&self, records: &[StoredChunk]) -> Result<usize> {
        let mut store = self.records.write().map_err(Self::poisoned)?;
        store.extend_from_slice(records);
        Ok(records.len())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        filter: Option<&RetrievalFilter>,
    ) -> Result<Vec<SearchResult>> {
        let records = self.records.read().map_err(Self::poisoned)?;

        let results: Vec<SearchResult> = records
            .iter()
            .filter(|r| filter.map_or(true, |f| f.matches(&r.source)))
            .map(|r| SearchResult {
                record: r.clone(),
                score: cosine_similarity(query_embedding, &r.embedding),
            })
            .collect();

        Ok(rank(results, limit))
    }

    async fn list_sources(&self) -> Result<Vec<SourceSummary>> {
        let records = self.records.read().map_err(Self::poisoned)?;

        let mut by_source: BTreeMap<&str, SourceSummary> = BTreeMap::new();
        for record in records.iter() {
            let entry = by_source
                .entry(record.source.as_str())
                .or_insert_with(|| SourceSummary {
                    source: record.source.clone(),
                    chunk_count: 0,
                    last_indexed_at: record.indexed_at,
                });
            entry.chunk_count += 1;
            if record.indexed_at > entry.last_indexed_at {
                entry.last_indexed_at = record.indexed_at;
            }
        }

        let mut summaries: Vec<SourceSummary> = by_source.into_values().collect();
        summaries.sort_by(|a, b| b.last_indexed_at.cmp(&a.last_indexed_at));
        Ok(summaries)
    }

    async fn chunk_count(&self) -> Result<usize> {
        let records = self.records.read().map_err(Self::poisoned)?;
        Ok(records.len())
    }
}
