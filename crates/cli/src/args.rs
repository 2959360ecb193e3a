//! Command-line arguments.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "exocortex", version, about = "Talk to the local Exocortex daemon and manage its asset cache")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send text to the chat daemon and print the reply. Reads stdin when TEXT is omitted.
    Ask {
        text: Option<String>,
    },
    /// Print the daemon's conversation history.
    History,
    /// Start a new conversation on the daemon.
    NewSession,
    /// Fetch the asset manifest into the cache.
    Install,
    /// Request a URL through the cache router and print the body.
    Fetch {
        url: String,
        /// HTTP method.
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        /// Request body, sent as JSON.
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Print a cached response body without touching the network.
    CacheGet {
        url: String,
    },
    /// Drop cache stores other than the current one, or only the named one.
    Purge {
        #[arg(long)]
        cache_name: Option<String>,
    },
}
