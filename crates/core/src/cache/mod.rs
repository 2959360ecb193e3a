//! SQLite-backed response cache.
//!
//! This module provides named, persistent response stores using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Request identity keys (method + URL) hashed with SHA-256
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Atomic per-key overwrite; entries never expire
//! - Dropping whole stores when the cache name is versioned forward

pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use key::RequestKey;
pub use store::{CacheStore, MemoryCache, NamedCache};
