//! Core types and shared functionality for exocortex.
//!
//! This crate provides:
//! - The asset cache router and its two caching strategies
//! - Named response stores with a SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod router;

pub use cache::{CacheDb, CacheStore, MemoryCache, NamedCache, RequestKey};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use router::{AssetManifest, AssetRequest, AssetResponse, Network, RequestClass, Router};
