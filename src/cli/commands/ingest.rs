//! Ingest command implementation.

use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::orchestrator::{IngestOutcome, Orchestrator};
use anyhow::Result;
use std::path::PathBuf;
use tracing::error;

/// Run the ingest command. Prints one outcome per file as a JSON array.
pub async fn run_ingest(files: &[PathBuf], settings: Settings, credentials: Credentials) -> Result<()> {
    Output::json(&ingest_outcomes(files, settings, credentials).await)
}

async fn ingest_outcomes(
    files: &[PathBuf],
    settings: Settings,
    credentials: Credentials,
) -> Vec<IngestOutcome> {
    // Without a credential the index is never opened or created.
    if let Err(e) = credentials.require().map(|_| ()) {
        return files.iter().map(|_| IngestOutcome::failure(&e)).collect();
    }

    match Orchestrator::new(settings, credentials) {
        Ok(orchestrator) => orchestrator.ingest_all(files).await,
        Err(e) => {
            error!("Failed to initialize pipeline: {}", e);
            files.iter().map(|_| IngestOutcome::failure(&e)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credential_leaves_index_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let persist = dir.path().join("index");
        let mut settings = Settings::default();
        settings.vector_store.persist_dir = persist.display().to_string();

        let files = vec![dir.path().join("a.txt"), dir.path().join("b.pdf")];
        let outcomes =
            ingest_outcomes(&files, settings, Credentials::new(None, "HUGGINGFACEHUB_API_TOKEN")).await;

        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            match outcome {
                IngestOutcome::Error { message } => {
                    assert!(message.starts_with("Configuration error:"))
                }
                other => panic!("unexpected: {:?}", other),
            }
        }
        assert!(!persist.exists());
    }
}
