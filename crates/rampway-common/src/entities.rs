//! Core entity types for a single pathway query.
//! Everything here is built fresh per query and never persisted.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RampwayError, Result};

lazy_static! {
    /// UniProtKB accession, optionally with an isoform suffix (P04637, Q5S007, A0A023GPI8, P04637-2).
    static ref UNIPROT_RE: Regex = Regex::new(
        r"^(?:[OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9](?:[A-Z][A-Z0-9]{2}[0-9]){1,2})(?:-[0-9]+)?$"
    ).expect("static regex");

    /// HMDB accession, legacy 5-digit or current 7-digit form (HMDB00122, HMDB0000122).
    static ref HMDB_RE: Regex = Regex::new(r"^HMDB(?:[0-9]{5}|[0-9]{7})$").expect("static regex");
}

// ---------------------------------------------------------------------------
// Analyte kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyteKind {
    Protein,
    Metabolite,
}

impl AnalyteKind {
    /// Does `id` have the canonical lexical form for this kind?
    pub fn matches_canonical_form(&self, id: &str) -> bool {
        match self {
            AnalyteKind::Protein    => UNIPROT_RE.is_match(id),
            AnalyteKind::Metabolite => HMDB_RE.is_match(id),
        }
    }

    /// Namespace prefix used when keying pathway queries (`uniprot:P04637`).
    pub fn type_prefix(&self) -> &'static str {
        match self {
            AnalyteKind::Protein    => "uniprot",
            AnalyteKind::Metabolite => "hmdb",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyteKind::Protein    => "protein",
            AnalyteKind::Metabolite => "metabolite",
        }
    }
}

impl fmt::Display for AnalyteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyteKind {
    type Err = RampwayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "protein" | "uniprot"   => Ok(AnalyteKind::Protein),
            "metabolite" | "hmdb"   => Ok(AnalyteKind::Metabolite),
            other => Err(RampwayError::Config(format!("unknown analyte kind '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Analyte identifier
// ---------------------------------------------------------------------------

/// How the canonical id was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierSource {
    UserProvided,
    NameMapped,
}

/// A resolved, typed analyte identifier.
///
/// The only constructor checks that `canonical_id` has the lexical form of
/// `kind`, and the fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyteIdentifier {
    raw_input: String,
    kind: AnalyteKind,
    canonical_id: String,
    source: IdentifierSource,
}

impl AnalyteIdentifier {
    pub fn new(
        raw_input: impl Into<String>,
        kind: AnalyteKind,
        canonical_id: impl Into<String>,
        source: IdentifierSource,
    ) -> Result<Self> {
        let canonical_id = canonical_id.into();
        if canonical_id.is_empty() || !kind.matches_canonical_form(&canonical_id) {
            return Err(RampwayError::InvalidIdentifier { id: canonical_id, kind });
        }
        Ok(Self {
            raw_input: raw_input.into(),
            kind,
            canonical_id,
            source,
        })
    }

    pub fn raw_input(&self) -> &str { &self.raw_input }
    pub fn kind(&self) -> AnalyteKind { self.kind }
    pub fn canonical_id(&self) -> &str { &self.canonical_id }
    pub fn source(&self) -> IdentifierSource { self.source }

    /// Type-prefixed key sent to the pathway service, e.g. `hmdb:HMDB0000122`.
    pub fn query_key(&self) -> String {
        format!("{}:{}", self.kind.type_prefix(), self.canonical_id)
    }
}

impl fmt::Display for AnalyteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_key())
    }
}

// ---------------------------------------------------------------------------
// Pathways
// ---------------------------------------------------------------------------

/// Name given to pathway entries that arrive without one.
pub const UNKNOWN_PATHWAY: &str = "Unknown";

/// One pathway entry as returned by the pathway service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayRecord {
    pub name: String,
    pub source_database: String,
    pub associated_analytes: Vec<String>,
}

impl PathwayRecord {
    /// Build a record; an empty or whitespace-only name becomes [`UNKNOWN_PATHWAY`].
    pub fn new(
        name: impl Into<String>,
        source_database: impl Into<String>,
        associated_analytes: Vec<String>,
    ) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() { UNKNOWN_PATHWAY.to_string() } else { name };
        Self {
            name,
            source_database: source_database.into(),
            associated_analytes,
        }
    }
}

/// A pathway with its relevance score in (0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPathway {
    pub pathway: PathwayRecord,
    pub score: f64,
}
