//! Pipeline orchestrator for DocMind.
//!
//! Wires loading, chunking, indexing, retrieval, prompt assembly and
//! completion into the two public operations: ingest a file, ask a question.
//! Each operation has a `try_` form returning a typed [`Result`] and a
//! boundary form returning a serializable outcome that never fails.

use crate::chunking::RecursiveChunker;
use crate::completion::{ChatModel, OpenAIChatModel};
use crate::config::{Credentials, Prompts, Settings};
use crate::document::Document;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{DocmindError, ErrorKind, Result};
use crate::rag::{build_messages, format_context, HistoryTurn};
use crate::vector_store::{
    RetrievalFilter, SourceSummary, SqliteVectorStore, VectorIndex, VectorStore,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// The main orchestrator for the DocMind pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    credentials: Credentials,
    chunker: RecursiveChunker,
    index: VectorIndex,
    chat_model: Arc<dyn ChatModel>,
}

impl Orchestrator {
    /// Create an orchestrator backed by the on-disk index and remote services.
    pub fn new(settings: Settings, credentials: Credentials) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = Arc::new(OpenAIEmbedder::new(&settings, &credentials)?);
        let chat_model = Arc::new(OpenAIChatModel::new(&settings, &credentials)?);
        let store = Arc::new(SqliteVectorStore::open(&settings.persist_dir())?);

        Self::with_components(settings, prompts, credentials, store, embedder, chat_model)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        credentials: Credentials,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        chat_model: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let chunker = RecursiveChunker::from_settings(&settings.chunking)?;

        Ok(Self {
            settings,
            prompts,
            credentials,
            chunker,
            index: VectorIndex::new(store, embedder),
            chat_model,
        })
    }

    /// Get a reference to the vector store.
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.index.store()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load, chunk, embed and store one file.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn try_ingest(&self, path: &Path) -> Result<IngestReport> {
        self.credentials.require()?;

        // PDF parsing is CPU-bound and may panic on malformed content.
        let owned = path.to_path_buf();
        let document = tokio::task::spawn_blocking(move || Document::load(&owned))
            .await
            .map_err(|e| {
                DocmindError::InvalidInput(format!("Failed to load {}: {}", path.display(), e))
            })??;

        let chunks = self.chunker.chunk(&document.text, &document.source);

        if chunks.is_empty() {
            warn!("{} produced no chunks; nothing was indexed", document.source);
        }

        let stored = self.index.insert(chunks).await?;
        info!("Ingested {} ({} chunks)", document.source, stored);

        Ok(IngestReport {
            file: document.source,
            chunks: stored,
        })
    }

    /// [`Self::try_ingest`] with every failure turned into an error outcome.
    pub async fn ingest(&self, path: &Path) -> IngestOutcome {
        match self.try_ingest(path).await {
            Ok(report) => IngestOutcome::Success {
                chunks: report.chunks,
                file: report.file,
            },
            Err(e) => {
                error!("Ingestion of {} failed: {}", path.display(), e);
                IngestOutcome::failure(&e)
            }
        }
    }

    /// Ingest each file independently; one failure does not stop the rest.
    pub async fn ingest_all(&self, paths: &[PathBuf]) -> Vec<IngestOutcome> {
        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            outcomes.push(self.ingest(path).await);
        }
        outcomes
    }

    /// Retrieve context for `query` and generate an answer.
    #[instrument(skip(self, history), fields(history = history.len()))]
    pub async fn try_ask(
        &self,
        query: &str,
        history: &[HistoryTurn],
        filter: Option<&RetrievalFilter>,
    ) -> Result<String> {
        self.credentials.require()?;

        if query.trim().is_empty() {
            return Err(DocmindError::InvalidInput("Query must not be empty".to_string()));
        }

        // Retrieval finishes before generation starts.
        let retrieved = self
            .index
            .search(query, self.settings.rag.top_k, filter)
            .await?;
        let passages: Vec<&str> = retrieved.iter().map(|r| r.content.as_str()).collect();
        let context = format_context(&passages);

        let messages = build_messages(&self.prompts, history, &context, query);

        let answer = self
            .chat_model
            .complete(&messages, self.settings.rag.max_tokens, self.settings.rag.temperature)
            .await?;
        let answer = answer.trim().to_string();

        info!("Answered from {} retrieved chunks", retrieved.len());
        Ok(answer)
    }

    /// [`Self::try_ask`] with every failure turned into an error outcome.
    pub async fn ask(
        &self,
        query: &str,
        history: &[HistoryTurn],
        filter: Option<&RetrievalFilter>,
    ) -> ChatOutcome {
        match self.try_ask(query, history, filter).await {
            Ok(answer) => ChatOutcome::Success { answer },
            Err(e) => {
                error!("Chat failed: {}", e);
                ChatOutcome::failure(&e)
            }
        }
    }

    /// List all indexed sources.
    pub async fn list_sources(&self) -> Result<Vec<SourceSummary>> {
        self.index.store().list_sources().await
    }
}

/// Configuration errors are shown as-is so the operator sees the fix.
fn failure_message(prefix: &str, err: &DocmindError) -> String {
    match err.kind() {
        ErrorKind::Configuration => err.to_string(),
        _ => format!("{}: {}", prefix, err),
    }
}

/// Result of ingesting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Source file name.
    pub file: String,
    /// Number of chunks stored.
    pub chunks: usize,
}

/// Per-file ingestion result as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestOutcome {
    Success { chunks: usize, file: String },
    Error { message: String },
}

impl IngestOutcome {
    /// Error outcome for `err`.
    pub fn failure(err: &DocmindError) -> Self {
        IngestOutcome::Error {
            message: failure_message("Ingestion failed", err),
        }
    }
}

/// Chat result as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChatOutcome {
    Success { answer: String },
    Error { message: String },
}

impl ChatOutcome {
    /// Error outcome for `err`.
    pub fn failure(err: &DocmindError) -> Self {
        ChatOutcome::Error {
            message: failure_message("Chat error", err),
        }
    }
}
