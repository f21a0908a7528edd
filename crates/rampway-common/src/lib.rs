//! rampway-common: Shared types, errors and configuration used across all Rampway crates.

pub mod error;
pub mod entities;
pub mod config;
pub mod sandbox;

// Re-export commonly used types
pub use config::{PipelineConfig, QueryConfig, ResolverConfig, ResolverStrategy, ExportConfig, ExportFormat, DiseaseSpec};
pub use entities::{AnalyteIdentifier, AnalyteKind, IdentifierSource, PathwayRecord, EnrichedPathway, UNKNOWN_PATHWAY};
pub use error::{RampwayError, Result};
