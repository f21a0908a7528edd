//! RaMP pathway API client.
//!
//! RaMP (Relational database of Metabolomic Pathways) links metabolites and
//! proteins to pathways from KEGG, Reactome, WikiPathways and HMDB.
//!
//! Request (one POST per candidate endpoint, tried in order):
//!   `{"input": ["hmdb:HMDB0000122"], "type": "pathway"}`
//!
//! Accepted response bodies:
//!   - `[ {entry}, ... ]`
//!   - `{"data": [ {entry}, ... ]}`
//!   - `{}` (no pathways)
//!
//! Entry fields: `name` | `pathway_name`, `source` | `pathway_source`,
//! `analyte_list` (array of strings or comma-separated string).

use std::time::Duration;

use async_trait::async_trait;
use rampway_common::sandbox::SandboxClient;
use rampway_common::{AnalyteIdentifier, PathwayRecord, QueryConfig, RampwayError, Result, UNKNOWN_PATHWAY};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::PathwaySource;

/// RaMP client over an ordered list of candidate endpoints.
pub struct RampClient {
    client: SandboxClient,
    endpoints: Vec<String>,
}

impl RampClient {
    /// Build from configuration. Endpoint hosts and `allowed_domains` are
    /// added to the sandbox allowlist.
    pub fn new(config: &QueryConfig) -> Result<Self> {
        let mut client = SandboxClient::with_timeout(config.timeout())?;
        for domain in &config.allowed_domains {
            client.allow_domain(domain);
        }
        for endpoint in &config.endpoints {
            if !client.allow_url_host(endpoint) {
                return Err(RampwayError::Config(format!("invalid pathway endpoint URL '{endpoint}'")));
            }
        }
        Ok(Self { client, endpoints: config.endpoints.clone() })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Per-endpoint request timeout.
    pub fn timeout(&self) -> Duration {
        self.client.timeout()
    }

    /// Request body for one identifier.
    pub fn request_body(identifier: &AnalyteIdentifier) -> Value {
        json!({
            "input": [identifier.query_key()],
            "type": "pathway",
        })
    }

    async fn query_endpoint(&self, endpoint: &str, body: &Value) -> Result<Vec<PathwayRecord>> {
        let resp = self.client.post(endpoint)?.json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RampwayError::MalformedResponse(format!("HTTP {status}")));
        }

        let json: Value = resp.json().await?;
        parse_response(&json)
    }
}

#[async_trait]
impl PathwaySource for RampClient {
    #[instrument(skip(self), fields(key = %identifier.query_key()))]
    async fn query(&self, identifier: &AnalyteIdentifier) -> Result<Vec<PathwayRecord>> {
        let body = Self::request_body(identifier);
        let mut last_error = String::from("no endpoints configured");

        // Strictly sequential: worst case is timeout × endpoints.
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            debug!(
                endpoint = %endpoint,
                attempt = i + 1,
                timeout_ms = self.timeout().as_millis() as u64,
                "Querying pathway endpoint"
            );
            match self.query_endpoint(endpoint, &body).await {
                Ok(records) => {
                    info!(endpoint = %endpoint, n = records.len(), "Pathway query succeeded");
                    return Ok(records);
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Pathway endpoint failed");
                    last_error = format!("{endpoint}: {e}");
                }
            }
        }

        Err(RampwayError::QueryUnavailable {
            endpoints: self.endpoints.clone(),
            last_error,
        })
    }

    fn name(&self) -> &str {
        "ramp"
    }
}

// ── Response mapping ──────────────────────────────────────────────────────────

/// Map a response body to pathway records, one per entry.
pub fn parse_response(json: &Value) -> Result<Vec<PathwayRecord>> {
    let entries: &[Value] = match json {
        Value::Array(arr) => arr.as_slice(),
        Value::Object(obj) if obj.is_empty() => &[],
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Array(arr)) => arr.as_slice(),
            _ => return Err(RampwayError::MalformedResponse("object without a 'data' array".to_string())),
        },
        other => {
            return Err(RampwayError::MalformedResponse(format!("unexpected JSON {}", type_name(other))));
        }
    };

    Ok(entries.iter().map(parse_entry).collect())
}

fn parse_entry(entry: &Value) -> PathwayRecord {
    let name = first_str(entry, &["name", "pathway_name"]).unwrap_or(UNKNOWN_PATHWAY);
    let source = first_str(entry, &["source", "pathway_source"]).unwrap_or("Unknown");

    let analytes = match entry.get("analyte_list") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };

    PathwayRecord::new(name, source, analytes)
}

/// First non-blank string among `keys`.
fn first_str<'a>(entry: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| entry.get(*k).and_then(|v| v.as_str()))
        .find(|s| !s.trim().is_empty())
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
