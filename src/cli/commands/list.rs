//! List command implementation.

use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings, credentials: Credentials) -> Result<()> {
    let orchestrator = Orchestrator::new(settings, credentials)?;

    match orchestrator.list_sources().await {
        Ok(sources) => {
            if sources.is_empty() {
                Output::info("No documents indexed yet. Use 'docmind ingest <file>' to add some.");
            } else {
                Output::header(&format!("Indexed Documents ({})", sources.len()));
                println!();

                for summary in &sources {
                    Output::source_info(summary);
                }

                let total_chunks: u32 = sources.iter().map(|s| s.chunk_count).sum();
                println!();
                Output::kv("Total documents", &sources.len().to_string());
                Output::kv("Total chunks", &total_chunks.to_string());
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list documents: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
