//! DocMind - question answering over your own documents
//!
//! A CLI and library for retrieval-augmented question answering over PDF and
//! text files. Documents are split into overlapping chunks, embedded through
//! an OpenAI-compatible endpoint, and stored in a local SQLite index. Questions
//! are answered by a chat model that sees only the retrieved passages.
//!
//! # Architecture
//!
//! - `config` - Settings file, prompt templates, credentials
//! - `document` - PDF and text extraction
//! - `chunking` - Recursive splitting with overlap
//! - `embedding` - Embedding generation
//! - `vector_store` - Durable vector index and filtered similarity search
//! - `rag` - Context assembly and conversation formatting
//! - `completion` - Chat completion client
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use docmind::config::{Credentials, Settings};
//! use docmind::orchestrator::Orchestrator;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::from_env(&settings.api.api_key_env);
//!     let orchestrator = Orchestrator::new(settings, credentials)?;
//!
//!     let report = orchestrator.try_ingest(Path::new("handbook.pdf")).await?;
//!     println!("Indexed {} chunks", report.chunks);
//!
//!     let answer = orchestrator.try_ask("How many vacation days do I get?", &[], None).await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod completion;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod vector_store;

#[cfg(test)]
mod testing;

pub use error::{DocmindError, ErrorKind, Result};
