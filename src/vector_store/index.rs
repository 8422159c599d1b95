//! Embedding-aware front of the vector store.

use super::{RetrievalFilter, StoredChunk, VectorStore};
use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{DocmindError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chunks retrieved per question unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 4;

/// A retrieved passage.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    /// Source file name.
    pub source: String,
    /// Chunk text.
    pub content: String,
    /// Cosine similarity to the query.
    pub score: f32,
}

/// Embeds chunks and queries, and delegates storage and ranking to a [`VectorStore`].
#[derive(Clone)]
pub struct VectorIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    /// Create a new index over `store`.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    /// The underlying store.
    pub fn store(&self) -> Arc<dyn VectorStore> {
        self.store.clone()
    }

    /// Embed and persist `chunks`. Returns the number stored.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn insert(&self, chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(DocmindError::ServiceUnavailable(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let records: Vec<StoredChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| StoredChunk::new(chunk, embedding))
            .collect();

        let count = self.store.insert(&records).await?;
        info!("Indexed {} chunks", count);
        Ok(count)
    }

    /// The `k` passages most similar to `query`, restricted by `filter`.
    #[instrument(skip(self, query))]
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&RetrievalFilter>,
    ) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self.store.search(&query_embedding, k, filter).await?;
        debug!("Retrieved {} chunks", results.len());

        Ok(results
            .into_iter()
            .map(|r| RetrievedChunk {
                source: r.record.source,
                content: r.record.content,
                score: r.score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::RecursiveChunker;
    use crate::error::ErrorKind;
    use crate::testing::{FailingEmbedder, HashEmbedder, ShortEmbedder};
    use crate::vector_store::{MemoryVectorStore, SqliteVectorStore};

    fn index_with(store: Arc<dyn VectorStore>) -> (VectorIndex, Arc<HashEmbedder>) {
        let embedder = Arc::new(HashEmbedder::new());
        (VectorIndex::new(store, embedder.clone()), embedder)
    }

    fn chunks(source: &str, texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk {
                source: source.to_string(),
                index: i,
                content: t.to_string(),
                start: 0,
                end: t.len(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_insert_then_search_recalls_chunk() {
        let (index, _) = index_with(Arc::new(SqliteVectorStore::in_memory().unwrap()));
        let text = "Solar panels convert sunlight into electricity.\n\n\
                    Wind turbines use moving air to generate power.\n\n\
                    The quarterly budget review happens every March.";
        let chunker = RecursiveChunker::new(60, 10).unwrap();
        index.insert(chunker.chunk(text, "energy.txt")).await.unwrap();

        let results = index
            .search("how do wind turbines generate power", DEFAULT_TOP_K, None)
            .await
            .unwrap();
        assert!(!results.is_empty());
        assert!(results.len() <= DEFAULT_TOP_K);
        assert!(results[0].content.contains("Wind turbines"));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_single_source_filter_excludes_better_matches() {
        let (index, _) = index_with(Arc::new(MemoryVectorStore::new()));
        index
            .insert(chunks("match.txt", &["rust borrow checker lifetimes", "rust borrow checker"]))
            .await
            .unwrap();
        index
            .insert(chunks("other.txt", &["gardening tomatoes", "rust on garden tools"]))
            .await
            .unwrap();

        let filter = RetrievalFilter::Source("other.txt".to_string());
        let results = index
            .search("rust borrow checker", 4, Some(&filter))
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.source == "other.txt"));
    }

    #[tokio::test]
    async fn test_multi_source_filter_is_union() {
        let (index, _) = index_with(Arc::new(SqliteVectorStore::in_memory().unwrap()));
        index.insert(chunks("a.txt", &["apple pie recipe"])).await.unwrap();
        index.insert(chunks("b.txt", &["apple orchard tour"])).await.unwrap();
        index.insert(chunks("c.txt", &["apple pie recipe exactly"])).await.unwrap();

        let filter = RetrievalFilter::AnyOf(vec!["a.txt".into(), "b.txt".into()]);
        let results = index.search("apple pie recipe", 4, Some(&filter)).await.unwrap();
        let sources: Vec<&str> = results.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_empty_insert_makes_no_calls() {
        let (index, embedder) = index_with(Arc::new(MemoryVectorStore::new()));
        assert_eq!(index.insert(Vec::new()).await.unwrap(), 0);
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_embedder_is_service_unavailable() {
        let index = VectorIndex::new(Arc::new(MemoryVectorStore::new()), Arc::new(FailingEmbedder));
        let err = index.insert(chunks("a.txt", &["text"])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);

        let err = index.search("text", 4, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    }

    #[tokio::test]
    async fn test_embedding_count_mismatch_stores_nothing() {
        let store = Arc::new(MemoryVectorStore::new());
        let index = VectorIndex::new(store.clone(), Arc::new(ShortEmbedder::default()));

        let err = index
            .insert(chunks("a.txt", &["first", "second", "third"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(store.chunk_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_insert_and_search() {
        let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::in_memory().unwrap());
        let (index, _) = index_with(store.clone());

        let mut handles = Vec::new();
        for n in 0..4 {
            let index = index.clone();
            handles.push(tokio::spawn(async move {
                let source = format!("doc{}.txt", n);
                index
                    .insert(chunks(&source, &["shared words here", "more shared words"]))
                    .await
                    .unwrap();
                index.search("shared words", 4, None).await.unwrap().len()
            }));
        }
        for handle in handles {
            let found = handle.await.unwrap();
            assert!(found >= 2 && found <= 4);
        }
        assert_eq!(store.chunk_count().await.unwrap(), 8);
    }
}
