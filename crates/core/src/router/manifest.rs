//! The asset manifest populated into the cache at install.

use url::Url;

use super::request::AssetRequest;
use super::url::{parse_origin, resolve};
use crate::Error;

/// Fixed, ordered list of asset URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    assets: Vec<Url>,
}

impl AssetManifest {
    /// Resolve `entries` against `origin`, keeping their order.
    pub fn resolve<S: AsRef<str>>(origin: &str, entries: &[S]) -> Result<Self, Error> {
        let origin = parse_origin(origin)?;
        let assets = entries
            .iter()
            .map(|entry| resolve(&origin, entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { assets })
    }

    pub fn assets(&self) -> &[Url] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// GET requests for every asset, in manifest order.
    pub fn requests(&self) -> impl Iterator<Item = AssetRequest> + '_ {
        self.assets.iter().cloned().map(AssetRequest::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_order_and_mixes_origins() {
        let manifest = AssetManifest::resolve(
            "http://localhost:8000",
            &["/web", "/web/index.html", "https://cdn.jsdelivr.net/npm/marked/marked.min.js"],
        )
        .unwrap();

        let urls: Vec<&str> = manifest.assets().iter().map(Url::as_str).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8000/web",
                "http://localhost:8000/web/index.html",
                "https://cdn.jsdelivr.net/npm/marked/marked.min.js",
            ]
        );
        assert!(manifest.requests().all(|r| r.method == "GET"));
    }

    #[test]
    fn test_resolve_rejects_bad_entry() {
        let result = AssetManifest::resolve("http://localhost:8000", &["/ok", "ftp://nope/file"]);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = AssetManifest::resolve::<&str>("http://localhost:8000", &[]).unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.len(), 0);
    }
}
