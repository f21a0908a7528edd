//! Offline pathway source with hardcoded data, for demos and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use rampway_common::{AnalyteIdentifier, PathwayRecord, RampwayError, Result};

use super::PathwaySource;

pub struct MockPathwaySource {
    data: HashMap<String, Vec<PathwayRecord>>,
    unavailable: bool,
}

impl MockPathwaySource {
    pub fn new() -> Self {
        Self { data: HashMap::new(), unavailable: false }
    }

    /// Add the pathways returned for a canonical id.
    pub fn with(mut self, canonical_id: &str, records: Vec<PathwayRecord>) -> Self {
        self.data.insert(canonical_id.to_string(), records);
        self
    }

    /// Make every query fail as if no endpoint answered.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Small demonstration data set used by the offline CLI mode.
    pub fn demo() -> Self {
        let rec = |name: &str, source: &str, analytes: &[&str]| {
            PathwayRecord::new(name, source, analytes.iter().map(|a| a.to_string()).collect())
        };
        Self::new()
            .with("P04637", vec![
                rec("p53 signaling pathway", "kegg", &["P04637", "Q00987", "P38936"]),
                rec("Apoptosis", "reactome", &["P04637"]),
            ])
            .with("HMDB0000122", vec![
                rec("Glycolysis / Gluconeogenesis", "kegg", &["HMDB0000122", "HMDB0000190", "HMDB0000243"]),
                rec("Insulin signaling", "wikipathways", &["HMDB0000122", "P01308"]),
                rec("Galactose metabolism", "hmdb", &[]),
            ])
            .with("HMDB0000073", vec![
                rec("Dopaminergic synapse", "kegg", &["HMDB0000073", "P37840"]),
                rec("Tyrosine metabolism", "hmdb", &["HMDB0000073"]),
            ])
            .with("P37840", vec![
                rec("Parkinson disease", "kegg", &["P37840", "Q5S007", "Q9BXM7"]),
            ])
    }
}

impl Default for MockPathwaySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PathwaySource for MockPathwaySource {
    async fn query(&self, identifier: &AnalyteIdentifier) -> Result<Vec<PathwayRecord>> {
        if self.unavailable {
            return Err(RampwayError::QueryUnavailable {
                endpoints: Vec::new(),
                last_error: "mock source configured as unavailable".to_string(),
            });
        }
        Ok(self.data.get(identifier.canonical_id()).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
