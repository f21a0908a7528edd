//! End-to-end pathway query pipeline.
//!
//! Orchestrates one user-initiated query:
//!   1. Resolve the input to a canonical identifier
//!   2. Query the pathway source
//!   3. Score each pathway
//!   4. Build the analyte–pathway graph
//!
//! States: `Idle → Resolving → Querying → Scoring → GraphBuilding → Ready`,
//! or `Failed(reason)` from `Resolving` / `Querying`. Every failure is
//! returned as a `QueryOutcome`, never as a panic, and nothing is retried.

use std::sync::Arc;

use rampway_common::{AnalyteIdentifier, AnalyteKind, EnrichedPathway, PipelineConfig, RampwayError};
use rampway_kg::AnalytePathwayGraph;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::normalise::AnalyteResolver;
use crate::sources::{MockPathwaySource, PathwaySource, RampClient};

// ── States ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    UnresolvedIdentifier,
    QueryUnavailable,
    EmptyResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryState {
    Idle,
    Resolving,
    Querying,
    Scoring,
    GraphBuilding,
    Ready,
    Failed(FailureReason),
}

impl QueryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryState::Ready | QueryState::Failed(_))
    }
}

/// Progress event emitted on every state transition (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
pub struct QueryProgress {
    pub query_id: Uuid,
    pub state: QueryState,
    pub message: String,
}

// ── Results ───────────────────────────────────────────────────────────────────

/// Everything the presentation layer renders for a successful query.
#[derive(Debug, Clone, Serialize)]
pub struct PathwayReport {
    pub identifier: AnalyteIdentifier,
    pub enriched: Vec<EnrichedPathway>,
    pub graph: AnalytePathwayGraph,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    Ready(PathwayReport),
    Failed {
        reason: FailureReason,
        message: String,
        /// Present when resolution succeeded before the failure.
        identifier: Option<AnalyteIdentifier>,
    },
}

impl QueryOutcome {
    pub fn report(&self) -> Option<&PathwayReport> {
        match self {
            QueryOutcome::Ready(r) => Some(r),
            QueryOutcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            QueryOutcome::Ready(_) => None,
            QueryOutcome::Failed { reason, .. } => Some(*reason),
        }
    }

    /// Message for the user. Failures are descriptive; success summarises.
    pub fn message(&self) -> String {
        match self {
            QueryOutcome::Ready(r) => format!(
                "Found {} pathways related to {}",
                r.enriched.len(),
                r.identifier.canonical_id()
            ),
            QueryOutcome::Failed { message, .. } => message.clone(),
        }
    }
}

/// One finished pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRun {
    pub query_id: Uuid,
    pub raw_input: String,
    pub kind: AnalyteKind,
    /// States visited in order, starting with `Idle`.
    pub states: Vec<QueryState>,
    pub outcome: QueryOutcome,
    pub duration_ms: u64,
}

impl QueryRun {
    pub fn final_state(&self) -> QueryState {
        self.states.last().copied().unwrap_or(QueryState::Idle)
    }
}

// ── Pipeline orchestrator ─────────────────────────────────────────────────────

pub struct PathwayPipeline {
    resolver: AnalyteResolver,
    source: Arc<dyn PathwaySource>,
}

impl PathwayPipeline {
    pub fn new(resolver: AnalyteResolver, source: Arc<dyn PathwaySource>) -> Self {
        Self { resolver, source }
    }

    /// Pipeline against the configured RaMP endpoints.
    pub fn from_config(config: &PipelineConfig) -> rampway_common::Result<Self> {
        let resolver = AnalyteResolver::from_config(&config.resolver, config.query.timeout())?;
        let source = RampClient::new(&config.query)?;
        Ok(Self::new(resolver, Arc::new(source)))
    }

    /// Pipeline against the built-in demonstration data; no network for pathways.
    pub fn offline(config: &PipelineConfig) -> rampway_common::Result<Self> {
        let resolver = AnalyteResolver::from_config(&config.resolver, config.query.timeout())?;
        Ok(Self::new(resolver, Arc::new(MockPathwaySource::demo())))
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Run one query to a terminal state.
    ///
    /// Progress events are sent via `progress_tx` if provided.
    #[instrument(skip(self, progress_tx))]
    pub async fn run(
        &self,
        raw_input: &str,
        kind: AnalyteKind,
        progress_tx: Option<&broadcast::Sender<QueryProgress>>,
    ) -> QueryRun {
        let query_id = Uuid::new_v4();
        let t0 = std::time::Instant::now();
        info!(query_id = %query_id, input = raw_input, %kind, "Starting pathway query");

        let mut states = vec![QueryState::Idle];
        let mut enter = |state: QueryState, message: String| {
            states.push(state);
            if let Some(tx) = progress_tx {
                // No receivers is fine.
                let _ = tx.send(QueryProgress { query_id, state, message });
            }
        };

        let outcome = 'run: {
            // ── 1. Resolve ────────────────────────────────────────────────────
            enter(QueryState::Resolving, format!("Resolving '{raw_input}' as {kind}"));
            let identifier = match self.resolver.resolve(raw_input, kind).await {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "Identifier resolution failed");
                    let message = format!("{e}. Check the spelling or enter a UniProt / HMDB accession.");
                    enter(QueryState::Failed(FailureReason::UnresolvedIdentifier), message.clone());
                    break 'run QueryOutcome::Failed {
                        reason: FailureReason::UnresolvedIdentifier,
                        message,
                        identifier: None,
                    };
                }
            };

            // ── 2. Query ──────────────────────────────────────────────────────
            enter(QueryState::Querying, format!("Querying {} for {}", self.source.name(), identifier.query_key()));
            let records = match self.source.query(&identifier).await {
                Ok(records) if records.is_empty() => {
                    let message = format!("No pathways found for {}.", identifier.query_key());
                    enter(QueryState::Failed(FailureReason::EmptyResult), message.clone());
                    break 'run QueryOutcome::Failed {
                        reason: FailureReason::EmptyResult,
                        message,
                        identifier: Some(identifier),
                    };
                }
                Ok(records) => records,
                Err(e) => {
                    warn!(error = %e, "Pathway query failed");
                    let message = if matches!(e, RampwayError::QueryUnavailable { .. }) {
                        format!("{e}. Please try again later.")
                    } else {
                        format!("Pathway service unavailable: {e}. Please try again later.")
                    };
                    enter(QueryState::Failed(FailureReason::QueryUnavailable), message.clone());
                    break 'run QueryOutcome::Failed {
                        reason: FailureReason::QueryUnavailable,
                        message,
                        identifier: Some(identifier),
                    };
                }
            };

            // ── 3. Score ──────────────────────────────────────────────────────
            enter(QueryState::Scoring, format!("Scoring {} pathways", records.len()));
            let enriched = rampway_ranker::score(&records);

            // ── 4. Graph ──────────────────────────────────────────────────────
            enter(QueryState::GraphBuilding, "Building analyte-pathway graph".to_string());
            let graph = rampway_kg::build(&identifier, &enriched);

            let report = PathwayReport { identifier, enriched, graph };
            enter(QueryState::Ready, format!("{} pathways ready", report.enriched.len()));
            QueryOutcome::Ready(report)
        };

        let duration_ms = t0.elapsed().as_millis() as u64;
        info!(query_id = %query_id, duration_ms, outcome = ?outcome.failure(), "Pathway query finished");

        QueryRun {
            query_id,
            raw_input: raw_input.to_string(),
            kind,
            states,
            outcome,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalise::StaticNameTable;
    use rampway_common::PathwayRecord;

    fn pipeline(source: MockPathwaySource) -> PathwayPipeline {
        PathwayPipeline::new(AnalyteResolver::new(StaticNameTable::builtin()), Arc::new(source))
    }

    #[tokio::test]
    async fn test_happy_path_states() {
        let run = pipeline(MockPathwaySource::demo()).run("P04637", AnalyteKind::Protein, None).await;
        assert_eq!(
            run.states,
            vec![
                QueryState::Idle,
                QueryState::Resolving,
                QueryState::Querying,
                QueryState::Scoring,
                QueryState::GraphBuilding,
                QueryState::Ready,
            ]
        );
        assert!(run.final_state().is_terminal());
        let report = run.outcome.report().unwrap();
        assert_eq!(report.enriched.len(), 2);
        assert_eq!(report.graph.node_count(), 3);
    }

    #[tokio::test]
    async fn test_unresolved_stops_before_query() {
        let run = pipeline(MockPathwaySource::demo()).run("not-a-thing", AnalyteKind::Metabolite, None).await;
        assert_eq!(run.final_state(), QueryState::Failed(FailureReason::UnresolvedIdentifier));
        assert!(!run.states.contains(&QueryState::Querying));
        assert!(run.outcome.message().contains("not-a-thing"));
    }

    #[tokio::test]
    async fn test_unavailable_source() {
        let run = pipeline(MockPathwaySource::demo().unavailable()).run("glucose", AnalyteKind::Metabolite, None).await;
        assert_eq!(run.outcome.failure(), Some(FailureReason::QueryUnavailable));
        match &run.outcome {
            QueryOutcome::Failed { identifier: Some(id), .. } => assert_eq!(id.canonical_id(), "HMDB0000122"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_result_is_distinct_from_unavailable() {
        let run = pipeline(MockPathwaySource::new()).run("P04637", AnalyteKind::Protein, None).await;
        assert_eq!(run.outcome.failure(), Some(FailureReason::EmptyResult));
        assert!(run.outcome.message().starts_with("No pathways found"));
        assert!(!run.states.contains(&QueryState::Scoring));
    }

    #[tokio::test]
    async fn test_progress_events_follow_states() {
        let (tx, mut rx) = broadcast::channel(16);
        let source = MockPathwaySource::new().with("P04637", vec![PathwayRecord::new("Apoptosis", "reactome", vec![])]);
        let run = pipeline(source).run("P04637", AnalyteKind::Protein, Some(&tx)).await;

        let mut seen = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.query_id, run.query_id);
            seen.push(ev.state);
        }
        assert_eq!(seen, run.states[1..].to_vec());
    }

    #[tokio::test]
    async fn test_outcome_serializes_with_status_tag() {
        let run = pipeline(MockPathwaySource::new()).run("P04637", AnalyteKind::Protein, None).await;
        let json = serde_json::to_value(&run.outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "empty_result");
    }
}
