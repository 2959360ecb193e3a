//! Subcommand implementations.
//!
//! Chat subcommands talk to the daemon directly; asset subcommands open the
//! cache database and go through the router.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use exocortex_client::{ChatClient, ChatConfig, FetchClient, FetchConfig};
use exocortex_core::{AppConfig, CacheDb, CacheStore, Error, NamedCache, Router};

use crate::args::Command;

pub async fn dispatch(command: Command, config: AppConfig) -> Result<()> {
    tracing::debug!(?command, cache = %config.cache_name, "dispatching");
    match command {
        Command::Ask { text } => ask(&config, text).await,
        Command::History => history(&config).await,
        Command::NewSession => {
            chat_client(&config)?.new_session().await.map_err(Error::from)?;
            eprintln!("new session started");
            Ok(())
        }
        Command::Install => {
            let (router, cache) = open_router(&config).await?;
            let count = router.install().await?;
            eprintln!("cached {count} assets in {}", cache.name());
            Ok(())
        }
        Command::Fetch { url, method, data } => fetch(&config, &url, &method, data).await,
        Command::CacheGet { url } => {
            let (router, cache) = open_router(&config).await?;
            let request = router.request("GET", &url)?;
            let response = cache
                .get(&request.key())
                .await?
                .ok_or_else(|| Error::CacheMiss(request.url.to_string()))?;
            write_body(&response.body).await
        }
        Command::Purge { cache_name } => {
            let db = CacheDb::open(&config.db_path).await?;
            let deleted = match cache_name {
                Some(name) => db.delete_cache(&name).await?,
                None => db.purge_stale_caches(&config.cache_name).await?,
            };
            eprintln!("deleted {deleted} entries");
            Ok(())
        }
    }
}

fn chat_client(config: &AppConfig) -> Result<ChatClient> {
    Ok(ChatClient::new(ChatConfig::from_app(config)).map_err(Error::from)?)
}

async fn open_router(config: &AppConfig) -> Result<(Router, NamedCache)> {
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache database {}", config.db_path.display()))?;
    let cache = db.open_cache(config.cache_name.clone());
    let network = Arc::new(FetchClient::new(FetchConfig::from_app(config))?);
    let router = Router::from_config(config, network, Arc::new(cache.clone()))?;
    tracing::debug!("opened cache {} at {}", cache.name(), config.db_path.display());
    Ok((router, cache))
}

async fn ask(config: &AppConfig, text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            input
        }
    };
    if text.trim().is_empty() {
        bail!("nothing to ask: pass TEXT or pipe it on stdin");
    }

    let reply = chat_client(config)?.ask(&text).await.map_err(Error::from)?;
    println!("{reply}");
    Ok(())
}

async fn history(config: &AppConfig) -> Result<()> {
    let turns = chat_client(config)?.history().await.map_err(Error::from)?;
    for turn in turns {
        println!("{}: {}", turn.role, turn.content);
    }
    Ok(())
}

async fn fetch(config: &AppConfig, url: &str, method: &str, data: Option<String>) -> Result<()> {
    let (router, _cache) = open_router(config).await?;
    let mut request = router.request(method, url)?;
    if let Some(data) = data {
        request = request.with_body(data);
    }

    let result = router.intercept(&request).await;
    // The process exits right after; let the background refresh land first.
    router.settle().await;
    let response = result?;

    eprintln!("{} {}", response.status, request.url);
    for (name, value) in &response.headers {
        eprintln!("{name}: {value}");
    }
    write_body(&response.body).await
}

async fn write_body(body: &[u8]) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(body).await?;
    stdout.flush().await?;
    Ok(())
}
