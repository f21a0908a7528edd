//! rampway-kg: Analyte–pathway graph construction and the disease explorer network.

pub mod graph;
pub mod disease;

pub use graph::{build, node_key, AnalytePathwayGraph, GraphEdge, GraphNode, NodeRole};
pub use disease::{build_network, filter_profile, DiseaseCatalog, OmicsNetwork, OmicsNode, OmicsRole};
