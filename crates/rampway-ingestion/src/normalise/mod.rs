//! Analyte identifier normalisation.
//!
//! `AnalyteResolver` turns free-form input into a typed [`AnalyteIdentifier`].
//! Input already in canonical form (UniProt / HMDB accession, in any letter
//! case) is passed through upper-cased; anything else is treated as a common
//! name and looked up through a pluggable [`NameLookup`]:
//! - `StaticNameTable`: in-memory table (built-in + config + TSV)
//! - `RemoteNameLookup`: HTTP identifier service

pub mod remote;
pub mod static_table;

pub use remote::RemoteNameLookup;
pub use static_table::StaticNameTable;

use std::time::Duration;

use async_trait::async_trait;
use rampway_common::{
    AnalyteIdentifier, AnalyteKind, IdentifierSource, RampwayError, ResolverConfig, ResolverStrategy, Result,
};
use tracing::{debug, info, warn};

/// Name → identifier lookup backing the resolver.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Case-insensitive exact match of `name` for `kind`.
    async fn lookup(&self, name: &str, kind: AnalyteKind) -> Option<String>;

    fn strategy(&self) -> ResolverStrategy;
}

pub struct AnalyteResolver {
    lookup: Box<dyn NameLookup>,
}

impl AnalyteResolver {
    pub fn new(lookup: impl NameLookup + 'static) -> Self {
        Self { lookup: Box::new(lookup) }
    }

    /// Build the configured strategy. `timeout` applies to remote lookups.
    pub fn from_config(config: &ResolverConfig, timeout: Duration) -> Result<Self> {
        let resolver = match config.strategy {
            ResolverStrategy::StaticTable => {
                let mut table = StaticNameTable::builtin();
                table.extend_from_config(&config.names);
                if let Some(ref path) = config.mapping_file {
                    table.merge_file(path)?;
                }
                info!(entries = table.n_entries(), "Static name table ready");
                Self::new(table)
            }
            ResolverStrategy::RemoteLookup => {
                Self::new(RemoteNameLookup::new(config.remote.clone(), timeout)?)
            }
        };
        Ok(resolver)
    }

    pub fn strategy(&self) -> ResolverStrategy {
        self.lookup.strategy()
    }

    /// Resolve `raw_input` to a canonical identifier of `declared_kind`.
    ///
    /// Fails with `UnresolvedIdentifier` when the input is neither in
    /// canonical form nor a known name, or when the mapped id does not have
    /// the lexical form of `declared_kind`.
    pub async fn resolve(&self, raw_input: &str, declared_kind: AnalyteKind) -> Result<AnalyteIdentifier> {
        let input = raw_input.trim();
        let unresolved = || RampwayError::UnresolvedIdentifier {
            input: raw_input.to_string(),
            kind: declared_kind,
        };

        if input.is_empty() {
            return Err(unresolved());
        }

        let candidate = input.to_ascii_uppercase();
        if declared_kind.matches_canonical_form(&candidate) {
            debug!(input, id = %candidate, kind = %declared_kind, "Input already canonical");
            return AnalyteIdentifier::new(raw_input, declared_kind, candidate, IdentifierSource::UserProvided);
        }

        let mapped = self.lookup.lookup(input, declared_kind).await.ok_or_else(unresolved)?;
        match AnalyteIdentifier::new(raw_input, declared_kind, mapped.as_str(), IdentifierSource::NameMapped) {
            Ok(id) => {
                info!(input, id = id.canonical_id(), "Resolved common name");
                Ok(id)
            }
            Err(_) => {
                warn!(input, mapped = %mapped, kind = %declared_kind, "Mapped id has the wrong form");
                Err(unresolved())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AnalyteResolver {
        AnalyteResolver::new(StaticNameTable::builtin())
    }

    #[tokio::test]
    async fn test_canonical_protein_passes_through() {
        for raw in ["P04637", "Q5S007", "P04637-2"] {
            let id = resolver().resolve(raw, AnalyteKind::Protein).await.unwrap();
            assert_eq!(id.canonical_id(), raw);
            assert_eq!(id.source(), IdentifierSource::UserProvided);
        }
    }

    #[tokio::test]
    async fn test_canonical_metabolite_passes_through() {
        let id = resolver().resolve("HMDB0000190", AnalyteKind::Metabolite).await.unwrap();
        assert_eq!(id.canonical_id(), "HMDB0000190");
        assert_eq!(id.source(), IdentifierSource::UserProvided);
    }

    #[tokio::test]
    async fn test_lowercase_accession_is_canonicalised() {
        let id = resolver().resolve("p04637", AnalyteKind::Protein).await.unwrap();
        assert_eq!(id.canonical_id(), "P04637");
        assert_eq!(id.raw_input(), "p04637");
        assert_eq!(id.source(), IdentifierSource::UserProvided);

        let id = resolver().resolve(" hmdb0000122", AnalyteKind::Metabolite).await.unwrap();
        assert_eq!(id.canonical_id(), "HMDB0000122");
        assert_eq!(id.source(), IdentifierSource::UserProvided);
    }

    #[tokio::test]
    async fn test_glucose_maps_to_hmdb() {
        let id = resolver().resolve("glucose", AnalyteKind::Metabolite).await.unwrap();
        assert_eq!(id.canonical_id(), "HMDB0000122");
        assert_eq!(id.source(), IdentifierSource::NameMapped);
        assert_eq!(id.raw_input(), "glucose");
    }

    #[tokio::test]
    async fn test_name_lookup_ignores_case_and_whitespace() {
        let id = resolver().resolve("  Uric Acid ", AnalyteKind::Metabolite).await.unwrap();
        assert_eq!(id.canonical_id(), "HMDB0000289");
    }

    #[tokio::test]
    async fn test_unknown_name_is_unresolved() {
        let err = resolver().resolve("unobtainium", AnalyteKind::Metabolite).await.unwrap_err();
        assert!(matches!(err, RampwayError::UnresolvedIdentifier { .. }));
    }

    #[tokio::test]
    async fn test_empty_input_is_unresolved() {
        let err = resolver().resolve("   ", AnalyteKind::Protein).await.unwrap_err();
        assert!(matches!(err, RampwayError::UnresolvedIdentifier { .. }));
    }

    #[tokio::test]
    async fn test_hmdb_id_declared_as_protein_is_unresolved() {
        let err = resolver().resolve("HMDB0000122", AnalyteKind::Protein).await.unwrap_err();
        assert!(matches!(err, RampwayError::UnresolvedIdentifier { .. }));
    }

    #[tokio::test]
    async fn test_mapped_id_of_wrong_form_is_unresolved() {
        let mut table = StaticNameTable::new();
        table.insert(AnalyteKind::Protein, "weird", "HMDB0000122");
        let err = AnalyteResolver::new(table).resolve("weird", AnalyteKind::Protein).await.unwrap_err();
        assert!(matches!(err, RampwayError::UnresolvedIdentifier { .. }));
    }

    #[test]
    fn test_from_config_static() {
        let resolver = AnalyteResolver::from_config(&ResolverConfig::default(), Duration::from_secs(1)).unwrap();
        assert_eq!(resolver.strategy(), ResolverStrategy::StaticTable);
    }

    #[tokio::test]
    async fn test_from_config_merges_mapping_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kind\tname\tid").unwrap();
        writeln!(file, "metabolite\tcitric acid|citrate anion\tHMDB0000094").unwrap();
        writeln!(file, "protein\tmy kinase\tP00533").unwrap();

        let config = ResolverConfig {
            mapping_file: Some(file.path().to_string_lossy().into_owned()),
            ..ResolverConfig::default()
        };
        let resolver = AnalyteResolver::from_config(&config, Duration::from_secs(1)).unwrap();

        let id = resolver.resolve("citric acid", AnalyteKind::Metabolite).await.unwrap();
        assert_eq!(id.canonical_id(), "HMDB0000094");
        assert_eq!(id.source(), IdentifierSource::NameMapped);

        let id = resolver.resolve("Citrate Anion", AnalyteKind::Metabolite).await.unwrap();
        assert_eq!(id.canonical_id(), "HMDB0000094");

        let id = resolver.resolve("my kinase", AnalyteKind::Protein).await.unwrap();
        assert_eq!(id.canonical_id(), "P00533");

        // Built-in entries survive the merge.
        let id = resolver.resolve("glucose", AnalyteKind::Metabolite).await.unwrap();
        assert_eq!(id.canonical_id(), "HMDB0000122");
    }

    #[test]
    fn test_from_config_missing_mapping_file() {
        let config = ResolverConfig {
            mapping_file: Some("/nonexistent/names.tsv".to_string()),
            ..ResolverConfig::default()
        };
        assert!(AnalyteResolver::from_config(&config, Duration::from_secs(1)).is_err());
    }
}
