//! exocortex command-line client.
//!
//! Sends text to the local chat daemon and drives the asset cache router.
//! Logs go to stderr; replies and bodies go to stdout.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

use args::Cli;
use exocortex_core::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match AppConfig::load() {
        Ok(config) => commands::dispatch(cli.command, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
