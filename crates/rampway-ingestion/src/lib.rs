//! rampway-ingestion: Identifier resolution, pathway retrieval and the query pipeline.
//! - Name normalisation (static table, remote lookup)
//! - Pathway sources (RaMP, offline mock)
//! - Pipeline orchestration and state tracking

pub mod normalise;
pub mod sources;
pub mod pipeline;

pub use normalise::{AnalyteResolver, NameLookup, RemoteNameLookup, StaticNameTable};
pub use pipeline::{FailureReason, PathwayPipeline, PathwayReport, QueryOutcome, QueryProgress, QueryRun, QueryState};
pub use sources::{MockPathwaySource, PathwaySource, RampClient};
