//! DocMind CLI entry point.

use anyhow::Result;
use clap::Parser;
use docmind::cli::{commands, Cli, Commands};
use docmind::config::{Credentials, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load_from(cli.config.as_ref())?;

    // Initialize logging; stdout is reserved for command output
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("docmind={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let credentials = Credentials::from_env(&settings.api.api_key_env);

    // Execute command
    match &cli.command {
        Commands::Ingest { files } => {
            commands::run_ingest(files, settings, credentials).await?;
        }

        Commands::Chat {
            query,
            filter,
            history,
        } => {
            commands::run_chat(query, filter.as_deref(), history.as_deref(), settings, credentials)
                .await?;
        }

        Commands::List => {
            commands::run_list(settings, credentials).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}
