//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust. Source filters are
//! applied in SQL, so only eligible rows are scored. WAL mode plus a busy
//! timeout lets several processes ingest and query the same file.

use super::{cosine_similarity, rank, RetrievalFilter, SearchResult, SourceSummary, StoredChunk, VectorStore};
use crate::error::{DocmindError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// File name of the database inside the persist directory.
pub const DB_FILE_NAME: &str = "index.sqlite3";

/// How long a writer waits for another process's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS chunks (
        id TEXT PRIMARY KEY,
        source TEXT NOT NULL,
        chunk_index INTEGER NOT NULL,
        content TEXT NOT NULL,
        embedding BLOB NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) the store inside `persist_dir`.
    #[instrument(skip_all, fields(dir = %persist_dir.display()))]
    pub fn open(persist_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(persist_dir).map_err(|e| {
            DocmindError::VectorStore(format!(
                "Cannot create index directory {}: {}",
                persist_dir.display(),
                e
            ))
        })?;

        let path = persist_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        // WAL keeps readers working while another process writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DocmindError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn parse_timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn insert(&self, records: &[StoredChunk]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO chunks (id, source, chunk_index, content, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;

            for record in records {
                stmt.execute(params![
                    record.id.to_string(),
                    record.source,
                    record.chunk_index,
                    record.content,
                    Self::embedding_to_bytes(&record.embedding),
                    record.indexed_at.to_rfc3339(),
                ])?;
            }
        }

        tx.commit()?;
        info!("Inserted {} chunks", records.len());
        Ok(records.len())
    }

    #[instrument(skip(self, query_embedding, filter))]
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        filter: Option<&RetrievalFilter>,
    ) -> Result<Vec<SearchResult>> {
        let sources: Vec<&str> = filter.map(|f| f.sources()).unwrap_or_default();
        if limit == 0 || (filter.is_some() && sources.is_empty()) {
            return Ok(Vec::new());
        }

        let mut sql = String::from(
            "SELECT id, source, chunk_index, content, embedding, indexed_at FROM chunks",
        );
        if filter.is_some() {
            let placeholders: Vec<String> = (1..=sources.len()).map(|i| format!("?{}", i)).collect();
            sql.push_str(&format!(" WHERE source IN ({})", placeholders.join(", ")));
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params_from_iter(sources.iter()), |row| {
            let id_str: String = row.get(0)?;
            let embedding_bytes: Vec<u8> = row.get(4)?;
            let indexed_at_str: String = row.get(5)?;

            Ok(StoredChunk {
                id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
                source: row.get(1)?,
                chunk_index: row.get(2)?,
                content: row.get(3)?,
                embedding: Self::bytes_to_embedding(&embedding_bytes),
                indexed_at: Self::parse_timestamp(&indexed_at_str),
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            let record = row?;
            let score = cosine_similarity(query_embedding, &record.embedding);
            results.push(SearchResult { record, score });
        }

        let results = rank(results, limit);
        debug!("Found {} matching chunks", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<SourceSummary>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source, COUNT(*) AS chunk_count, MAX(indexed_at) AS last_indexed_at
            FROM chunks
            GROUP BY source
            ORDER BY last_indexed_at DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(2)?;
            Ok(SourceSummary {
                source: row.get(0)?,
                chunk_count: row.get(1)?,
                last_indexed_at: Self::parse_timestamp(&indexed_at_str),
            })
        })?;

        let summaries = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    async fn chunk_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
