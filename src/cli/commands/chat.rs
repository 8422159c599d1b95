//! Chat command implementation.

use crate::cli::args::{parse_filter, parse_history};
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::orchestrator::{ChatOutcome, Orchestrator};
use crate::rag::HistoryTurn;
use crate::vector_store::RetrievalFilter;
use anyhow::Result;
use tracing::{debug, error, warn};

/// Run the chat command. Prints a single outcome as JSON.
pub async fn run_chat(
    query: &str,
    filter: Option<&str>,
    history: Option<&str>,
    settings: Settings,
    credentials: Credentials,
) -> Result<()> {
    let filter = match filter.map(parse_filter) {
        Some(parsed) => {
            if parsed.is_fallback() {
                debug!("Using filter verbatim as a single source name");
            }
            parsed.into_inner()
        }
        None => None,
    };

    let history = match history.map(parse_history) {
        Some(parsed) => {
            if parsed.is_fallback() {
                warn!("Ignoring history that is not a JSON array of {{role, content}} turns");
            }
            parsed.into_inner()
        }
        None => Vec::new(),
    };

    Output::json(&chat_outcome(query, &history, filter.as_ref(), settings, credentials).await)
}

async fn chat_outcome(
    query: &str,
    history: &[HistoryTurn],
    filter: Option<&RetrievalFilter>,
    settings: Settings,
    credentials: Credentials,
) -> ChatOutcome {
    // Without a credential the index is never opened or created.
    if let Err(e) = credentials.require().map(|_| ()) {
        return ChatOutcome::failure(&e);
    }

    match Orchestrator::new(settings, credentials) {
        Ok(orchestrator) => orchestrator.ask(query, history, filter).await,
        Err(e) => {
            error!("Failed to initialize pipeline: {}", e);
            ChatOutcome::failure(&e)
        }
    }
}
