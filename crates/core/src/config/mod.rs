//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (EXOCORTEX_*)
//! 2. TOML config file (if EXOCORTEX_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (EXOCORTEX_*)
/// 2. TOML config file (if EXOCORTEX_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name of the cache store. Bump the version suffix to invalidate every entry.
    ///
    /// Set via EXOCORTEX_CACHE_NAME environment variable.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Path to SQLite cache database.
    ///
    /// Set via EXOCORTEX_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Origin that root-relative URLs resolve against.
    ///
    /// Set via EXOCORTEX_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path prefix that routes a request to the network-first strategy.
    ///
    /// Set via EXOCORTEX_API_PREFIX environment variable.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Assets fetched into the cache at install time, in order.
    ///
    /// Set via EXOCORTEX_MANIFEST environment variable or the `manifest` TOML array.
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via EXOCORTEX_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via EXOCORTEX_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Optional HTTP request timeout in milliseconds.
    ///
    /// Unset by default: a hung fetch stays pending.
    /// Set via EXOCORTEX_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Host of the chat daemon.
    ///
    /// Set via EXOCORTEX_CHAT_HOST environment variable.
    #[serde(default = "default_chat_host")]
    pub chat_host: String,

    /// Port of the chat daemon.
    ///
    /// Set via EXOCORTEX_CHAT_PORT environment variable.
    #[serde(default = "default_chat_port")]
    pub chat_port: u16,

    /// Whether the server runs the install step when it starts.
    ///
    /// Set via EXOCORTEX_INSTALL_ON_START environment variable.
    #[serde(default = "default_true")]
    pub install_on_start: bool,
}

fn default_cache_name() -> String {
    "pdei-exocortex-v1".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./exocortex-cache.sqlite")
}

fn default_origin() -> String {
    "http://localhost:8000".into()
}

fn default_api_prefix() -> String {
    "/api/".into()
}

fn default_manifest() -> Vec<String> {
    [
        "/web",
        "/web/index.html",
        "https://unpkg.com/react@18/umd/react.development.js",
        "https://unpkg.com/react-dom@18/umd/react-dom.development.js",
        "https://unpkg.com/@babel/standalone/babel.min.js",
        "https://cdn.jsdelivr.net/npm/marked/marked.min.js",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_user_agent() -> String {
    "exocortex/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_chat_host() -> String {
    "localhost".into()
}

fn default_chat_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            db_path: default_db_path(),
            origin: default_origin(),
            api_prefix: default_api_prefix(),
            manifest: default_manifest(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: None,
            chat_host: default_chat_host(),
            chat_port: default_chat_port(),
            install_on_start: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Base URL of the chat daemon, e.g. `http://localhost:8000`.
    pub fn chat_base_url(&self) -> String {
        format!("http://{}:{}", self.chat_host, self.chat_port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `EXOCORTEX_`
    /// 2. TOML file from `EXOCORTEX_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("EXOCORTEX_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("EXOCORTEX_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.cache_name, "pdei-exocortex-v1");
        assert_eq!(config.db_path, PathBuf::from("./exocortex-cache.sqlite"));
        assert_eq!(config.origin, "http://localhost:8000");
        assert_eq!(config.api_prefix, "/api/");
        assert_eq!(config.manifest.len(), 6);
        assert_eq!(config.manifest[0], "/web");
        assert_eq!(config.user_agent, "exocortex/0.1");
        assert_eq!(config.max_bytes, 5_242_880);
        assert!(config.timeout_ms.is_none());
        assert!(config.install_on_start);
    }

    #[test]
    fn test_timeout_unset_by_default() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), None);

        let config = AppConfig { timeout_ms: Some(1500), ..Default::default() };
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_chat_base_url() {
        let config = AppConfig { chat_host: "10.0.0.2".into(), chat_port: 9000, ..Default::default() };
        assert_eq!(config.chat_base_url(), "http://10.0.0.2:9000");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let toml = r#"
            cache_name = "pdei-exocortex-v2"
            manifest = ["/index.html"]
        "#;
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap();
        assert_eq!(config.cache_name, "pdei-exocortex-v2");
        assert_eq!(config.manifest, vec!["/index.html".to_string()]);
        assert_eq!(config.api_prefix, "/api/");
    }
}
