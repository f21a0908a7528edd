//! Remote name lookup.
//!
//! Resolves a common name by calling an identifier service (UniProt REST by
//! default for proteins). The URL template carries a `{name}` placeholder
//! and the identifier is read from the JSON body with a JSON pointer, e.g.
//! `/results/0/primaryAccession`.

use std::time::Duration;

use async_trait::async_trait;
use rampway_common::config::RemoteLookupConfig;
use rampway_common::sandbox::SandboxClient;
use rampway_common::{AnalyteKind, ResolverStrategy, Result};
use tracing::{debug, instrument, warn};

use super::NameLookup;

pub struct RemoteNameLookup {
    client: SandboxClient,
    config: RemoteLookupConfig,
}

impl RemoteNameLookup {
    pub fn new(config: RemoteLookupConfig, timeout: Duration) -> Result<Self> {
        let mut client = SandboxClient::with_timeout(timeout)?;
        for url in [&config.protein_url, &config.metabolite_url].into_iter().flatten() {
            // The placeholder only ever sits in the path or query.
            client.allow_url_host(url);
        }
        Ok(Self { client, config })
    }

    /// Fill the `{name}` placeholder with the URL-encoded name.
    pub fn request_url(template: &str, name: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        template.replace("{name}", &encoded)
    }

    async fn fetch(&self, url: &str, pointer: &str) -> Result<Option<String>> {
        let resp = self.client.get(url)?.send().await?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), url, "Name lookup returned non-success status");
            return Ok(None);
        }
        let json: serde_json::Value = resp.json().await?;
        Ok(extract_id(&json, pointer))
    }
}

/// Read a non-empty string id at `pointer`.
pub fn extract_id(json: &serde_json::Value, pointer: &str) -> Option<String> {
    json.pointer(pointer)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl NameLookup for RemoteNameLookup {
    #[instrument(skip(self))]
    async fn lookup(&self, name: &str, kind: AnalyteKind) -> Option<String> {
        let (template, pointer) = match self.config.target_for(kind) {
            Some(t) => t,
            None => {
                debug!(%kind, "No remote lookup service configured");
                return None;
            }
        };
        let url = Self::request_url(template, name.trim());

        match self.fetch(&url, pointer).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Remote name lookup failed; treating as not found");
                None
            }
        }
    }

    fn strategy(&self) -> ResolverStrategy {
        ResolverStrategy::RemoteLookup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_url_encodes_name() {
        let url = RemoteNameLookup::request_url("https://rest.uniprot.org/search?query=gene_exact:{name}", "uric acid");
        assert_eq!(url, "https://rest.uniprot.org/search?query=gene_exact:uric+acid");
    }

    #[test]
    fn test_extract_id_uniprot_shape() {
        let body = json!({"results": [{"primaryAccession": "P04637"}]});
        assert_eq!(extract_id(&body, "/results/0/primaryAccession").as_deref(), Some("P04637"));
    }

    #[test]
    fn test_extract_id_missing() {
        assert_eq!(extract_id(&json!({"results": []}), "/results/0/primaryAccession"), None);
        assert_eq!(extract_id(&json!({"id": ""}), "/id"), None);
        assert_eq!(extract_id(&json!({"id": 42}), "/id"), None);
    }

    #[tokio::test]
    async fn test_unconfigured_kind_is_not_found() {
        let lookup = RemoteNameLookup::new(RemoteLookupConfig::default(), Duration::from_secs(1)).unwrap();
        assert_eq!(lookup.lookup("glucose", AnalyteKind::Metabolite).await, None);
        assert_eq!(lookup.strategy(), ResolverStrategy::RemoteLookup);
    }
}
