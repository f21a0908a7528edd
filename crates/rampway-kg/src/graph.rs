//! Analyte–pathway star graph.
//!
//! One analyte node sits at the centre; each distinct pathway name becomes a
//! leaf connected to it by exactly one edge. Pathways are never connected to
//! each other.
//!
//! Edges refer to nodes by their role-qualified key (`analyte:P04637`,
//! `pathway:Apoptosis`), so a pathway whose name equals the analyte id
//! stays distinct from it.

use std::collections::HashSet;

use rampway_common::{AnalyteIdentifier, EnrichedPathway};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Analyte,
    Pathway,
}

impl NodeRole {
    fn prefix(&self) -> &'static str {
        match self {
            NodeRole::Analyte => "analyte",
            NodeRole::Pathway => "pathway",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Unique within the graph: `<role>:<id>`.
    pub key: String,
    pub id: String,
    pub role: NodeRole,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, role: NodeRole) -> Self {
        let id = id.into();
        Self { key: node_key(role, &id), id, role }
    }
}

pub fn node_key(role: NodeRole, id: &str) -> String {
    format!("{}:{id}", role.prefix())
}

/// Undirected edge between the analyte key (`source`) and a pathway key (`target`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalytePathwayGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl AnalytePathwayGraph {
    /// Nodes in insertion order; the analyte node is always first.
    pub fn nodes(&self) -> &[GraphNode] { &self.nodes }
    pub fn edges(&self) -> &[GraphEdge] { &self.edges }
    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    pub fn analyte(&self) -> &GraphNode {
        &self.nodes[0]
    }

    pub fn pathway_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.role == NodeRole::Pathway)
    }

    /// Is there an edge between the analyte and `pathway`?
    pub fn has_edge_to(&self, pathway: &str) -> bool {
        let key = node_key(NodeRole::Pathway, pathway);
        self.edges.iter().any(|e| e.target == key)
    }
}

/// Build the star graph for one query.
///
/// Deterministic and order-preserving; a pathway name seen twice keeps its
/// first position and gets no second edge.
pub fn build(identifier: &AnalyteIdentifier, enriched: &[EnrichedPathway]) -> AnalytePathwayGraph {
    let analyte = GraphNode::new(identifier.canonical_id(), NodeRole::Analyte);
    let analyte_key = analyte.key.clone();

    let mut nodes = Vec::with_capacity(enriched.len() + 1);
    let mut edges = Vec::with_capacity(enriched.len());
    nodes.push(analyte);

    let mut seen: HashSet<&str> = HashSet::new();
    for entry in enriched {
        let name = entry.pathway.name.as_str();
        if !seen.insert(name) {
            continue;
        }
        let node = GraphNode::new(name, NodeRole::Pathway);
        edges.push(GraphEdge { source: analyte_key.clone(), target: node.key.clone() });
        nodes.push(node);
    }

    tracing::debug!(
        analyte = %analyte_key,
        nodes = nodes.len(),
        edges = edges.len(),
        "Built analyte-pathway graph"
    );

    AnalytePathwayGraph { nodes, edges }
}
