//! Whole-chain aggregate statistics and batch-import reporting

use serde::{Deserialize, Serialize};

/// Whole-chain summary statistics with risk and opportunity assessments.
///
/// Computed in a single pass over consecutive station pairs; always derived
/// on demand from current chain state. An empty chain yields the neutral
/// default below (perfect score, empty assessment lists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Mean inclination change rate across pairs (degrees per 100 ft, signed)
    pub avg_build_rate: f64,
    /// Mean azimuth change rate across pairs (degrees per 100 ft, signed)
    pub avg_turn_rate: f64,
    /// Worst dogleg severity observed (degrees per 100 ft)
    pub max_dls: f64,
    /// Mean dogleg severity across pairs (degrees per 100 ft)
    pub avg_dls: f64,
    /// Number of pairs with dogleg severity above the violation limit
    pub dls_violation_count: usize,
    /// Curvature-weighted path length: Σ dls·Δmd/100 (degrees)
    pub tortuosity: f64,
    /// 0-100 score of how well the trajectory tracks the plan
    pub on_target_score: f64,
    /// All applicable risk messages (non-exclusive rule list)
    pub risk_factors: Vec<String>,
    /// All applicable opportunity messages (non-exclusive rule list)
    pub opportunities: Vec<String>,
}

impl Default for AggregateStats {
    /// Neutral result for a degenerate (empty) chain.
    fn default() -> Self {
        Self {
            avg_build_rate: 0.0,
            avg_turn_rate: 0.0,
            max_dls: 0.0,
            avg_dls: 0.0,
            dls_violation_count: 0,
            tortuosity: 0.0,
            on_target_score: 100.0,
            risk_factors: Vec::new(),
            opportunities: Vec::new(),
        }
    }
}

/// Per-row outcome of a batch import.
///
/// A rejected row never aborts the batch - it is reported here with the
/// rendered rejection reason so the operator can correct the source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatchReport {
    /// Rows committed to the chain
    pub accepted: usize,
    /// Rows rejected at validation, in input order
    pub rejected: Vec<RejectedRow>,
}

impl BatchReport {
    /// Total rows seen in the batch.
    pub fn total(&self) -> usize {
        self.accepted + self.rejected.len()
    }
}

/// One rejected batch row with the reason it failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based position of the row in the submitted batch
    pub row: usize,
    /// Measured depth of the rejected tuple (ft)
    pub md: f64,
    /// Rendered rejection reason, naming the offending field and value
    pub reason: String,
}
