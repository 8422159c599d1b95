//! CLI output formatting utilities.

use crate::vector_store::SourceSummary;
use anyhow::Result;
use console::style;
use serde::Serialize;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print a value as one line of JSON on stdout.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
        println!("{}", serde_json::to_string(value)?);
        Ok(())
    }

    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one indexed source.
    pub fn source_info(summary: &SourceSummary) {
        println!(
            "  {} {} ({} chunks, indexed {})",
            style("*").cyan(),
            style(&summary.source).bold(),
            summary.chunk_count,
            style(summary.last_indexed_at.format("%Y-%m-%d %H:%M UTC")).dim()
        );
    }
}
