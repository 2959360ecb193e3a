//! Request classification.

use url::Url;

/// The two request classes. Every URL falls in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Path starts with the API prefix: network first, cache as fallback.
    Api,
    /// Everything else: stale-while-revalidate.
    Static,
}

/// Classify `url` by whether its path starts with `api_prefix`.
pub fn classify(url: &Url, api_prefix: &str) -> RequestClass {
    if url.path().starts_with(api_prefix) { RequestClass::Api } else { RequestClass::Static }
}
