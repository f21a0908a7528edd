//! Disease multi-omics explorer.
//!
//! A small catalog of diseases, each with associated proteins, metabolites
//! and pathways, and the network linking them: every protein connects to
//! every metabolite and every pathway of the same disease.

use std::f64::consts::PI;

use rampway_common::{DiseaseSpec, RampwayError, Result};
use serde::Serialize;

/// Ordered catalog of disease profiles.
#[derive(Debug, Clone)]
pub struct DiseaseCatalog {
    diseases: Vec<DiseaseSpec>,
}

fn spec(name: &str, proteins: &[&str], metabolites: &[&str], pathways: &[&str]) -> DiseaseSpec {
    let owned = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() };
    DiseaseSpec {
        name: name.to_string(),
        proteins: owned(proteins),
        metabolites: owned(metabolites),
        pathways: owned(pathways),
    }
}

impl DiseaseCatalog {
    /// Built-in demonstration profiles.
    pub fn builtin() -> Self {
        Self {
            diseases: vec![
                spec(
                    "Parkinson's Disease",
                    &["SNCA", "LRRK2", "PINK1"],
                    &["Dopamine", "Alpha-synuclein", "Uric acid"],
                    &["Dopaminergic synapse", "Oxidative phosphorylation"],
                ),
                spec(
                    "Renal Cancer",
                    &["VHL", "HIF1A", "VEGFA"],
                    &["Succinate", "Fumarate", "Glutamine"],
                    &["HIF-1 signaling", "Metabolic reprogramming"],
                ),
                spec(
                    "Type 2 Diabetes",
                    &["INS", "IRS1", "GLUT4"],
                    &["Glucose", "Insulin", "Lactate"],
                    &["Insulin signaling", "Glycolysis"],
                ),
            ],
        }
    }

    /// Merge `extra` over the catalog. A profile whose name matches an
    /// existing one (case-insensitive) replaces it in place; others are appended.
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = DiseaseSpec>) -> Self {
        for profile in extra {
            match self.position(&profile.name) {
                Some(i) => self.diseases[i] = profile,
                None => self.diseases.push(profile),
            }
        }
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.diseases.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize { self.diseases.len() }
    pub fn is_empty(&self) -> bool { self.diseases.is_empty() }

    /// Case-insensitive lookup by disease name.
    pub fn get(&self, name: &str) -> Result<&DiseaseSpec> {
        self.position(name)
            .map(|i| &self.diseases[i])
            .ok_or_else(|| RampwayError::UnknownDisease {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    fn position(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.diseases.iter().position(|d| d.name.to_lowercase() == wanted)
    }
}

impl Default for DiseaseCatalog {
    fn default() -> Self { Self::builtin() }
}

/// Keep only entries containing `term` (case-insensitive). An empty term keeps everything.
pub fn filter_profile(profile: &DiseaseSpec, term: &str) -> DiseaseSpec {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return profile.clone();
    }
    let keep = |xs: &[String]| -> Vec<String> {
        xs.iter().filter(|x| x.to_lowercase().contains(&term)).cloned().collect()
    };
    DiseaseSpec {
        name: profile.name.clone(),
        proteins: keep(&profile.proteins),
        metabolites: keep(&profile.metabolites),
        pathways: keep(&profile.pathways),
    }
}

// ── Network ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OmicsRole {
    Protein,
    Metabolite,
    Pathway,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OmicsNode {
    pub label: String,
    pub role: OmicsRole,
}

/// Network of one disease profile. Edges are `(from, to)` node indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OmicsNetwork {
    pub disease: String,
    pub nodes: Vec<OmicsNode>,
    pub edges: Vec<(usize, usize)>,
}

impl OmicsNetwork {
    /// Evenly spaced positions on the unit circle, one per node, in node order.
    pub fn circular_layout(&self) -> Vec<(f64, f64)> {
        let n = self.nodes.len();
        (0..n)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / n as f64;
                (angle.cos(), angle.sin())
            })
            .collect()
    }

    pub fn count(&self, role: OmicsRole) -> usize {
        self.nodes.iter().filter(|n| n.role == role).count()
    }
}

/// Nodes are proteins, then metabolites, then pathways. Each protein links
/// to every metabolite and every pathway; nothing else is linked.
pub fn build_network(profile: &DiseaseSpec) -> OmicsNetwork {
    let mut nodes = Vec::new();
    let groups = [
        (&profile.proteins, OmicsRole::Protein),
        (&profile.metabolites, OmicsRole::Metabolite),
        (&profile.pathways, OmicsRole::Pathway),
    ];
    for (labels, role) in groups {
        nodes.extend(labels.iter().map(|l| OmicsNode { label: l.clone(), role }));
    }

    let mut edges = Vec::new();
    for (i, from) in nodes.iter().enumerate() {
        if from.role != OmicsRole::Protein {
            continue;
        }
        for (j, to) in nodes.iter().enumerate() {
            if to.role != OmicsRole::Protein && from.label != to.label {
                edges.push((i, j));
            }
        }
    }

    OmicsNetwork { disease: profile.name.clone(), nodes, edges }
}
