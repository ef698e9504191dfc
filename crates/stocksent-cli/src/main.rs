//! stocksent
//!
//! Reads tweets from standard input and prints their predicted sentiment.

use anyhow::Result;
use clap::Parser;
use stocksent_cli::cli::Cli;
use stocksent_cli::{app, AppConfig};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    let config = AppConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let classified = app::run(&config, stdin.lock(), stdout.lock())?;

    info!("Classified {} tweets", classified);
    Ok(())
}

/// Initialize tracing/logging on stderr; stdout carries only prompts and results
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("stocksent_cli=debug,stocksent_classifiers=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
