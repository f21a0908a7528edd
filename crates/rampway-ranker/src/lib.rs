//! rampway-ranker: Pathway relevance scoring.

pub mod scorer;

pub use scorer::{connectivity_score, score};
