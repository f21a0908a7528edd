//! Static common-name → identifier table.
//!
//! Ships with a small built-in set of proteins (UniProt) and metabolites
//! (HMDB) and can be extended from configuration or from a TSV file:
//!
//! ```text
//! kind        name                    id
//! metabolite  glucose|dextrose        HMDB0000122
//! protein     TP53|p53                P04637
//! ```

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rampway_common::config::NameMapping;
use rampway_common::{AnalyteKind, ResolverStrategy};

use super::NameLookup;

/// Built-in entries: (kind, names separated by '|', id).
const BUILTIN: &[(AnalyteKind, &str, &str)] = &[
    // Metabolites (HMDB)
    (AnalyteKind::Metabolite, "glucose|d-glucose|dextrose", "HMDB0000122"),
    (AnalyteKind::Metabolite, "dopamine",                   "HMDB0000073"),
    (AnalyteKind::Metabolite, "uric acid|urate",            "HMDB0000289"),
    (AnalyteKind::Metabolite, "succinate|succinic acid",    "HMDB0000254"),
    (AnalyteKind::Metabolite, "fumarate|fumaric acid",      "HMDB0000134"),
    (AnalyteKind::Metabolite, "glutamine|l-glutamine",      "HMDB0000641"),
    (AnalyteKind::Metabolite, "lactate|lactic acid|l-lactic acid", "HMDB0000190"),
    (AnalyteKind::Metabolite, "citrate|citric acid",        "HMDB0000094"),
    (AnalyteKind::Metabolite, "pyruvate|pyruvic acid",      "HMDB0000243"),
    (AnalyteKind::Metabolite, "cholesterol",                "HMDB0000067"),
    (AnalyteKind::Metabolite, "serotonin",                  "HMDB0000259"),
    (AnalyteKind::Metabolite, "alanine|l-alanine",          "HMDB0000161"),
    // Proteins (UniProt, human)
    (AnalyteKind::Protein, "tp53|p53",                      "P04637"),
    (AnalyteKind::Protein, "snca|alpha-synuclein",          "P37840"),
    (AnalyteKind::Protein, "lrrk2",                         "Q5S007"),
    (AnalyteKind::Protein, "pink1",                         "Q9BXM7"),
    (AnalyteKind::Protein, "vhl",                           "P40337"),
    (AnalyteKind::Protein, "hif1a",                         "Q16665"),
    (AnalyteKind::Protein, "vegfa",                         "P15692"),
    (AnalyteKind::Protein, "ins|insulin",                   "P01308"),
    (AnalyteKind::Protein, "irs1",                          "P35568"),
    (AnalyteKind::Protein, "glut4|slc2a4",                  "P14672"),
    (AnalyteKind::Protein, "egfr",                          "P00533"),
    (AnalyteKind::Protein, "kras",                          "P01116"),
];

/// In-memory name table keyed by (kind, lowercased name).
#[derive(Debug, Clone, Default)]
pub struct StaticNameTable {
    lookup: HashMap<(AnalyteKind, String), String>,
}

impl StaticNameTable {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-filled with the built-in proteins and metabolites.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (kind, names, id) in BUILTIN {
            for name in names.split('|') {
                table.insert(*kind, name, id);
            }
        }
        table
    }

    /// Build from a TSV string with a header row (for testing / offline use).
    pub fn from_tsv(tsv: &str) -> Result<Self> {
        let mut table = Self::new();
        table.merge_tsv(tsv)?;
        Ok(table)
    }

    /// Merge the rows of a mapping TSV. Returns the number of names added.
    ///
    /// Rows with fewer than three columns or an unknown kind are skipped.
    pub fn merge_tsv(&mut self, tsv: &str) -> Result<usize> {
        let mut added = 0usize;

        for (line_no, line) in tsv.lines().enumerate() {
            // Skip header row
            if line_no == 0 || line.trim().is_empty() { continue; }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() < 3 {
                tracing::debug!(line = line_no + 1, "Skipping short mapping row");
                continue;
            }

            let kind: AnalyteKind = match fields[0].parse() {
                Ok(k) => k,
                Err(_) => {
                    tracing::debug!(line = line_no + 1, kind = fields[0], "Skipping row with unknown kind");
                    continue;
                }
            };
            let id = fields[2];
            if id.is_empty() { continue; }

            for name in fields[1].split('|').filter(|s| !s.trim().is_empty()) {
                self.insert(kind, name, id);
                added += 1;
            }
        }

        tracing::info!("Name table merged {} entries, {} total", added, self.lookup.len());
        Ok(added)
    }

    /// Read and merge a mapping TSV file.
    pub fn merge_file(&mut self, path: &str) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read name mapping file {path}"))?;
        self.merge_tsv(&content)
    }

    /// Add configured entries; later entries override earlier ones.
    pub fn extend_from_config(&mut self, mappings: &[NameMapping]) {
        for m in mappings {
            self.insert(m.kind, &m.name, &m.id);
        }
    }

    pub fn insert(&mut self, kind: AnalyteKind, name: &str, id: &str) {
        self.lookup.insert((kind, name.trim().to_lowercase()), id.trim().to_string());
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Case-insensitive exact match.
    pub fn get(&self, name: &str, kind: AnalyteKind) -> Option<&str> {
        self.lookup
            .get(&(kind, name.trim().to_lowercase()))
            .map(String::as_str)
    }

    /// Number of lookup entries (every alias counts).
    pub fn n_entries(&self) -> usize { self.lookup.len() }
}

#[async_trait]
impl NameLookup for StaticNameTable {
    async fn lookup(&self, name: &str, kind: AnalyteKind) -> Option<String> {
        self.get(name, kind).map(str::to_string)
    }

    fn strategy(&self) -> ResolverStrategy {
        ResolverStrategy::StaticTable
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tsv() -> String {
        let header = "kind\tname\tid";
        let citrate = "metabolite\tCitrate|Citric acid\tHMDB0000094";
        let kras = "protein\tKRAS|K-RAS\tP01116";
        let bad = "lipid\tpalmitate\tLMFA01010001";
        let short = "protein\tNOID";
        format!("{header}\n{citrate}\n{kras}\n{bad}\n{short}\n")
    }

    #[test]
    fn test_builtin_glucose() {
        let t = StaticNameTable::builtin();
        assert_eq!(t.get("glucose", AnalyteKind::Metabolite), Some("HMDB0000122"));
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let t = StaticNameTable::builtin();
        assert_eq!(t.get("GLUCOSE", AnalyteKind::Metabolite), Some("HMDB0000122"));
        assert_eq!(t.get("  Tp53 ", AnalyteKind::Protein), Some("P04637"));
    }

    #[test]
    fn test_kind_is_part_of_key() {
        let t = StaticNameTable::builtin();
        assert!(t.get("glucose", AnalyteKind::Protein).is_none());
        assert!(t.get("tp53", AnalyteKind::Metabolite).is_none());
    }

    #[test]
    fn test_exact_match_only() {
        let t = StaticNameTable::builtin();
        assert!(t.get("gluc", AnalyteKind::Metabolite).is_none());
        assert!(t.get("glucose 6-phosphate", AnalyteKind::Metabolite).is_none());
    }

    #[test]
    fn test_from_tsv_aliases_and_skips() {
        let t = StaticNameTable::from_tsv(&sample_tsv()).unwrap();
        assert_eq!(t.n_entries(), 4);
        assert_eq!(t.get("citric acid", AnalyteKind::Metabolite), Some("HMDB0000094"));
        assert_eq!(t.get("k-ras", AnalyteKind::Protein), Some("P01116"));
        assert!(t.get("palmitate", AnalyteKind::Metabolite).is_none());
    }

    #[test]
    fn test_config_entries_override() {
        let mut t = StaticNameTable::builtin();
        t.extend_from_config(&[NameMapping {
            kind: AnalyteKind::Metabolite,
            name: "Glucose".to_string(),
            id: "HMDB0000516".to_string(),
        }]);
        assert_eq!(t.get("glucose", AnalyteKind::Metabolite), Some("HMDB0000516"));
    }

    #[tokio::test]
    async fn test_name_lookup_trait() {
        let t = StaticNameTable::builtin();
        assert_eq!(t.lookup("Dopamine", AnalyteKind::Metabolite).await.as_deref(), Some("HMDB0000073"));
        assert_eq!(t.lookup("unobtainium", AnalyteKind::Metabolite).await, None);
        assert_eq!(t.strategy(), ResolverStrategy::StaticTable);
    }
}
