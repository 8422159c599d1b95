//! CLI module for DocMind.

pub mod args;
pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DocMind - question answering over your own documents
///
/// Ingest PDF and text files into a local vector index, then ask questions
/// answered only from what those files contain.
#[derive(Parser, Debug)]
#[command(name = "docmind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DOCMIND_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest PDF or text files into the index (prints a JSON array of results)
    Ingest {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Answer a question from the indexed documents (prints a JSON result)
    Chat {
        /// The question to ask
        #[arg(short, long)]
        query: String,

        /// Source file name, or JSON array of names, to restrict retrieval to
        #[arg(short, long)]
        filter: Option<String>,

        /// Prior turns as a JSON array of {"role", "content"} objects
        #[arg(long)]
        history: Option<String>,
    },

    /// List indexed documents
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
