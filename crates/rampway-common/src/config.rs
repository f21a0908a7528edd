//! Pipeline configuration.
//!
//! Passed explicitly into the resolver, the query client and the exporters
//! when they are constructed. Every section has defaults so a partial file
//! (or none at all) still yields a usable pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::entities::AnalyteKind;

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pathway service endpoints and timeout
    #[serde(default)]
    pub query: QueryConfig,

    /// Name → identifier mapping strategy
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Report output options
    #[serde(default)]
    pub export: ExportConfig,

    /// Extra diseases for the explorer, merged over the built-in catalog
    #[serde(default)]
    pub diseases: Vec<DiseaseSpec>,
}

// ── Query ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Candidate endpoints, tried in order.
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Per-endpoint request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Hosts allowed in addition to the endpoint hosts.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
}

fn default_endpoints() -> Vec<String> {
    vec!["https://rampdb.nih.gov/api/pathways-from-analytes".to_string()]
}
fn default_timeout_secs() -> u64 { 10 }

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            timeout_secs: default_timeout_secs(),
            allowed_domains: vec![],
        }
    }
}

impl QueryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Resolver ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverStrategy {
    StaticTable,
    RemoteLookup,
}

/// Extra entry for the static name table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameMapping {
    pub kind: AnalyteKind,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_strategy")]
    pub strategy: ResolverStrategy,

    /// Entries added to the built-in static table.
    #[serde(default)]
    pub names: Vec<NameMapping>,

    /// Optional TSV file (`kind<TAB>name<TAB>id`) merged into the static table.
    #[serde(default)]
    pub mapping_file: Option<String>,

    #[serde(default)]
    pub remote: RemoteLookupConfig,
}

fn default_strategy() -> ResolverStrategy { ResolverStrategy::StaticTable }

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            names: vec![],
            mapping_file: None,
            remote: RemoteLookupConfig::default(),
        }
    }
}

/// Remote name lookup. URL templates carry a `{name}` placeholder and the id
/// is read from the JSON response with a JSON pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteLookupConfig {
    #[serde(default = "default_protein_url")]
    pub protein_url: Option<String>,
    #[serde(default = "default_protein_pointer")]
    pub protein_id_pointer: String,
    #[serde(default)]
    pub metabolite_url: Option<String>,
    #[serde(default = "default_metabolite_pointer")]
    pub metabolite_id_pointer: String,
}

fn default_protein_url() -> Option<String> {
    Some(
        "https://rest.uniprot.org/uniprotkb/search?query=gene_exact:{name}+AND+organism_id:9606+AND+reviewed:true&fields=accession&format=json&size=1"
            .to_string(),
    )
}
fn default_protein_pointer() -> String { "/results/0/primaryAccession".to_string() }
fn default_metabolite_pointer() -> String { "/id".to_string() }

impl Default for RemoteLookupConfig {
    fn default() -> Self {
        Self {
            protein_url: default_protein_url(),
            protein_id_pointer: default_protein_pointer(),
            metabolite_url: None,
            metabolite_id_pointer: default_metabolite_pointer(),
        }
    }
}

impl RemoteLookupConfig {
    /// URL template and id pointer for `kind`, if a service is configured.
    pub fn target_for(&self, kind: AnalyteKind) -> Option<(&str, &str)> {
        match kind {
            AnalyteKind::Protein => self
                .protein_url
                .as_deref()
                .map(|u| (u, self.protein_id_pointer.as_str())),
            AnalyteKind::Metabolite => self
                .metabolite_url
                .as_deref()
                .map(|u| (u, self.metabolite_id_pointer.as_str())),
        }
    }
}

// ── Export ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Text,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv  => "csv",
            ExportFormat::Text => "txt",
            ExportFormat::Pdf  => "pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = crate::error::RampwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv"          => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Text),
            "pdf"          => Ok(ExportFormat::Pdf),
            other => Err(crate::error::RampwayError::Config(format!("unknown export format '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,
}

fn default_output_dir() -> String { ".".to_string() }
fn default_formats() -> Vec<ExportFormat> { vec![ExportFormat::Csv, ExportFormat::Pdf] }

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            formats: default_formats(),
        }
    }
}

// ── Diseases ─────────────────────────────────────────────────────────────────

/// Multi-omics profile of one disease for the explorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseSpec {
    pub name: String,
    #[serde(default)]
    pub proteins: Vec<String>,
    #[serde(default)]
    pub metabolites: Vec<String>,
    #[serde(default)]
    pub pathways: Vec<String>,
}

// ── Helper Methods ───────────────────────────────────────────────────────────

impl PipelineConfig {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
