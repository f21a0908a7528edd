//! Domain-allowlisted HTTP client.
//!
//! All outbound requests go through [`SandboxClient`]; hosts outside the
//! allowlist are refused before any connection is made.

use reqwest::{Client, ClientBuilder, Method};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::RampwayError;

/// Default per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP client that only talks to approved domains.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
    timeout: Duration,
}

impl SandboxClient {
    /// Creates a client with the default allowlist of pathway and identifier services.
    pub fn new() -> Result<Self, RampwayError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, RampwayError> {
        let defaults = [
            "rampdb.nih.gov",         // RaMP-DB
            "rest.uniprot.org",       // UniProt REST
            "hmdb.ca",                // HMDB
            "www.ebi.ac.uk",          // ChEBI / Reactome mirrors
            "reactome.org",           // Reactome
            "localhost",
            "127.0.0.1",
        ];
        let allowlist: HashSet<String> = defaults.iter().map(|d| d.to_string()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| RampwayError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, allowlist, timeout })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Allows the host of `url`. Returns false if the URL has no host.
    pub fn allow_url_host(&mut self, url: &str) -> bool {
        match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) {
            Some(host) => {
                self.allowlist.insert(host);
                true
            }
            None => false,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether `url` targets an allowed host or one of its subdomains.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) else {
            return false;
        };
        self.allowlist.iter().any(|allowed| {
            host == *allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, RampwayError> {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, RampwayError> {
        self.request(Method::POST, url)
    }

    fn request(&self, method: Method, url: &str) -> Result<reqwest::RequestBuilder, RampwayError> {
        if !self.is_allowed(url) {
            warn!(%method, url, "Blocked request to host outside the allowlist");
            return Err(RampwayError::SecurityError(format!("host not in allowlist: {url}")));
        }
        debug!(%method, url, "Sandboxed request");
        Ok(self.client.request(method, url))
    }
}
