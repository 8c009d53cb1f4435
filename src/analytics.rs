//! Whole-chain statistics and risk aggregation
//!
//! A single pass over consecutive station pairs producing:
//! - average build/turn rates and dogleg statistics
//! - tortuosity (curvature-weighted path length)
//! - an on-target score penalized for violations, remaining
//!   vertical-section shift, and rough drilling
//! - non-exclusive risk and opportunity message lists
//!
//! Like the classifier this is a deterministic rule table; every rule that
//! applies contributes its message.

use crate::angles::circular_delta;
use crate::types::{AggregateStats, Survey, WellPlan};

/// Rule thresholds and penalties for the aggregate.
pub mod scoring_rules {
    /// Dogleg severity above this counts as a violation (deg/100ft)
    pub const RULE_DLS_VIOLATION: f64 = 3.0;
    /// Score penalty per violation
    pub const RULE_VIOLATION_PENALTY: f64 = 10.0;

    // === Remaining vertical-section shift bands ===
    /// Shift above this costs the severe penalty (ft)
    pub const RULE_SHIFT_SEVERE_FT: f64 = 50.0;
    pub const RULE_SHIFT_SEVERE_PENALTY: f64 = 30.0;
    /// Shift above this costs the moderate penalty (ft)
    pub const RULE_SHIFT_MODERATE_FT: f64 = 20.0;
    pub const RULE_SHIFT_MODERATE_PENALTY: f64 = 15.0;
    /// Shift above this costs the minor penalty (ft)
    pub const RULE_SHIFT_MINOR_FT: f64 = 10.0;
    pub const RULE_SHIFT_MINOR_PENALTY: f64 = 5.0;

    /// Average dogleg above this reads as rough drilling (deg/100ft)
    pub const RULE_AVG_DLS_ROUGH: f64 = 2.5;
    pub const RULE_AVG_DLS_PENALTY: f64 = 15.0;

    // === Risk rules ===
    /// Average dogleg above this is a standalone risk (deg/100ft)
    pub const RULE_RISK_AVG_DLS: f64 = 3.0;
    /// More than this many violations is a risk
    pub const RULE_RISK_VIOLATIONS: usize = 1;
    /// Tortuosity above this is a risk (degrees)
    pub const RULE_RISK_TORTUOSITY: f64 = 15.0;
    /// Sustained turn-rate magnitude above this is a risk (deg/100ft)
    pub const RULE_RISK_TURN_RATE: f64 = 2.0;
    /// Shift above this while close to target depth is a risk (ft)
    pub const RULE_RISK_SHIFT_FT: f64 = 30.0;
    /// "Close to target" distance for the shift risk (ft of TVD)
    pub const RULE_RISK_NEAR_TARGET_FT: f64 = 200.0;

    // === Opportunity rules ===
    /// Average dogleg below this is a smooth wellbore (deg/100ft)
    pub const RULE_OPPORTUNITY_AVG_DLS: f64 = 1.5;
    /// Shift below this is on course (ft)
    pub const RULE_OPPORTUNITY_SHIFT_FT: f64 = 10.0;
    /// Build-rate magnitude below this is a stable trend (deg/100ft)
    pub const RULE_OPPORTUNITY_BUILD_RATE: f64 = 1.0;
}

/// Aggregate a whole chain into summary statistics and assessments.
///
/// An empty chain yields the neutral default (score 100, empty lists).
/// A single station has no pairs, so the pair-derived terms stay zero
/// while the shift and score terms still apply to that station.
pub fn aggregate(surveys: &[Survey], plan: &WellPlan) -> AggregateStats {
    use scoring_rules::*;

    let last = match surveys.last() {
        Some(last) => last,
        None => return AggregateStats::default(),
    };

    let mut build_sum = 0.0;
    let mut turn_sum = 0.0;
    let mut dls_sum = 0.0;
    let mut max_dls: f64 = 0.0;
    let mut violations = 0usize;
    let mut tortuosity = 0.0;

    for pair in surveys.windows(2) {
        let delta_md = pair[1].md - pair[0].md;
        build_sum += (pair[1].inc - pair[0].inc) * 100.0 / delta_md;
        turn_sum += circular_delta(pair[0].azi, pair[1].azi) * 100.0 / delta_md;

        let dls = pair[1].dogleg_severity;
        dls_sum += dls;
        max_dls = max_dls.max(dls);
        if dls > RULE_DLS_VIOLATION {
            violations += 1;
        }
        tortuosity += dls * delta_md / 100.0;
    }

    let pairs = surveys.len().saturating_sub(1);
    let (avg_build_rate, avg_turn_rate, avg_dls) = if pairs > 0 {
        let n = pairs as f64;
        (build_sum / n, turn_sum / n, dls_sum / n)
    } else {
        (0.0, 0.0, 0.0)
    };

    let remaining_shift = (plan.proposed_vertical_section - last.vertical_section).abs();
    let remaining_dist = plan.target_tvd - last.tvd;

    let mut score = 100.0;
    score -= violations as f64 * RULE_VIOLATION_PENALTY;
    if remaining_shift > RULE_SHIFT_SEVERE_FT {
        score -= RULE_SHIFT_SEVERE_PENALTY;
    } else if remaining_shift > RULE_SHIFT_MODERATE_FT {
        score -= RULE_SHIFT_MODERATE_PENALTY;
    } else if remaining_shift > RULE_SHIFT_MINOR_FT {
        score -= RULE_SHIFT_MINOR_PENALTY;
    }
    if avg_dls > RULE_AVG_DLS_ROUGH {
        score -= RULE_AVG_DLS_PENALTY;
    }
    let on_target_score = score.clamp(0.0, 100.0);

    let mut risk_factors = Vec::new();
    if avg_dls > RULE_RISK_AVG_DLS {
        risk_factors.push("High average dogleg severity".to_string());
    }
    if violations > RULE_RISK_VIOLATIONS {
        risk_factors.push("Multiple dogleg severity violations".to_string());
    }
    if tortuosity > RULE_RISK_TORTUOSITY {
        risk_factors.push("High cumulative tortuosity".to_string());
    }
    if avg_turn_rate.abs() > RULE_RISK_TURN_RATE {
        risk_factors.push("Sustained azimuth walk".to_string());
    }
    if remaining_shift > RULE_RISK_SHIFT_FT && remaining_dist < RULE_RISK_NEAR_TARGET_FT {
        risk_factors.push("Large vertical-section shift remaining near target depth".to_string());
    }

    let mut opportunities = Vec::new();
    if avg_dls < RULE_OPPORTUNITY_AVG_DLS {
        opportunities.push("Smooth wellbore - low average dogleg".to_string());
    }
    if violations == 0 {
        opportunities.push("No dogleg severity violations".to_string());
    }
    if remaining_shift < RULE_OPPORTUNITY_SHIFT_FT {
        opportunities.push("On course for planned vertical section".to_string());
    }
    if avg_build_rate.abs() < RULE_OPPORTUNITY_BUILD_RATE {
        opportunities.push("Stable inclination trend".to_string());
    }

    AggregateStats {
        avg_build_rate,
        avg_turn_rate,
        max_dls,
        avg_dls,
        dls_violation_count: violations,
        tortuosity,
        on_target_score,
        risk_factors,
        opportunities,
    }
}
