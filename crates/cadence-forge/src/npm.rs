use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::http::{client, decode, ensure_success, execute, join_segments, parse_base};
use crate::Result;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Abbreviated packument, enough to list versions.
const MEDIA_TYPE: &str = "application/vnd.npm.install-v1+json";
const NOT_FOUND: u16 = 404;

#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(default)]
    versions: serde_json::Map<String, serde_json::Value>,
}

pub struct NpmRegistry {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl NpmRegistry {
    /// # Errors
    ///
    /// Returns an error if `registry_url` is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(registry_url: &str, token: Option<String>) -> Result<Self> {
        Ok(Self {
            http: client()?,
            base: parse_base(registry_url)?,
            token,
        })
    }

    /// Every version ever published for `name`, in registry order. A package
    /// the registry has never seen has no versions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the registry answers with a
    /// non-2xx status other than 404.
    pub fn published_versions(&self, name: &str) -> Result<Vec<String>> {
        let url = join_segments(&self.base, [name])?;
        let target = format!("GET {url}");

        let mut request = self.http.get(url).header(ACCEPT, MEDIA_TYPE);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!(%target, "registry request");
        let (status, body) = execute(request, &target)?;
        if status == NOT_FOUND {
            debug!(package = name, "package not found in registry");
            return Ok(Vec::new());
        }
        ensure_success(&target, status, &body)?;

        versions_from_packument(&target, &body)
    }
}

fn versions_from_packument(target: &str, body: &str) -> Result<Vec<String>> {
    let packument: Packument = decode(target, body)?;
    Ok(packument.versions.into_iter().map(|(version, _)| version).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_listed_in_registry_order() {
        let body = r#"{
            "name": "widgets",
            "dist-tags": {"latest": "1.2.0"},
            "versions": {"1.0.0": {}, "1.1.0": {}, "1.2.0": {}, "2.0.0-next.0": {}}
        }"#;

        let versions = versions_from_packument("GET widgets", body).expect("decodes");

        assert_eq!(versions, ["1.0.0", "1.1.0", "1.2.0", "2.0.0-next.0"]);
    }

    #[test]
    fn packument_without_versions_is_empty() {
        let versions = versions_from_packument("GET widgets", r#"{"name": "widgets"}"#).expect("decodes");

        assert!(versions.is_empty());
    }

    #[test]
    fn registry_accepts_custom_base() {
        let registry = NpmRegistry::new("https://npm.pkg.github.com/", None).expect("registry");

        assert_eq!(registry.base.as_str(), "https://npm.pkg.github.com/");
    }
}
