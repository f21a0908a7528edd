//! Pathway relevance scoring.
//!
//! The score is a connectivity penalty, not a statistical enrichment test:
//!
//!   score(p) = round4( 1 / (1 + |analytes(p)|) )
//!
//! A pathway that lists few analytes is considered more specific to the
//! queried analyte than one that lists many. No p-values and no
//! multiple-testing correction are computed.

use rampway_common::{EnrichedPathway, PathwayRecord};
use tracing::debug;

/// Number of decimal digits kept in a score.
pub const SCORE_DECIMALS: i32 = 4;

/// Smallest representable score; keeps very large pathways above zero after rounding.
pub const MIN_SCORE: f64 = 0.0001;

/// Round to `decimals` digits after the point.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Score for a pathway listing `n_analytes` associated analytes.
pub fn connectivity_score(n_analytes: usize) -> f64 {
    let raw = 1.0 / (1.0 + n_analytes as f64);
    round_to(raw, SCORE_DECIMALS).max(MIN_SCORE)
}

/// Score every record. One output per input, in input order.
pub fn score(records: &[PathwayRecord]) -> Vec<EnrichedPathway> {
    let enriched: Vec<EnrichedPathway> = records
        .iter()
        .map(|record| EnrichedPathway {
            pathway: record.clone(),
            score: connectivity_score(record.associated_analytes.len()),
        })
        .collect();

    debug!(n = enriched.len(), "Scored pathway records");
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, n: usize) -> PathwayRecord {
        let analytes = (0..n).map(|i| format!("A{i}")).collect();
        PathwayRecord::new(name, "reactome", analytes)
    }

    #[test]
    fn test_known_values() {
        assert_eq!(connectivity_score(0), 1.0);
        assert_eq!(connectivity_score(1), 0.5);
        assert_eq!(connectivity_score(3), 0.25);
        assert_eq!(connectivity_score(2), 0.3333);
        assert_eq!(connectivity_score(5), 0.1667);
    }

    #[test]
    fn test_monotonically_non_increasing() {
        let mut prev = connectivity_score(0);
        for n in 1..500 {
            let s = connectivity_score(n);
            assert!(s <= prev, "score rose at n={n}: {s} > {prev}");
            prev = s;
        }
    }

    #[test]
    fn test_score_stays_positive() {
        assert_eq!(connectivity_score(1_000_000), MIN_SCORE);
        assert!(connectivity_score(usize::MAX) > 0.0);
    }

    #[test]
    fn test_order_and_length_preserved() {
        let records = vec![record("Glycolysis", 3), record("TCA cycle", 0), record("Apoptosis", 1)];
        let enriched = score(&records);
        assert_eq!(enriched.len(), records.len());
        let names: Vec<&str> = enriched.iter().map(|e| e.pathway.name.as_str()).collect();
        assert_eq!(names, vec!["Glycolysis", "TCA cycle", "Apoptosis"]);
        let scores: Vec<f64> = enriched.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![0.25, 1.0, 0.5]);
    }

    #[test]
    fn test_empty_input() {
        assert!(score(&[]).is_empty());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
    }
}
