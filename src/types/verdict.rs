//! Quality classification types

use serde::{Deserialize, Serialize};

/// Verdict status for a single survey station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SurveyStatus {
    /// Station is consistent with the build plan
    #[default]
    Passed,
    /// Station needs monitoring (excessive inclination change)
    Warning,
    /// Station breaches the dogleg-severity limit
    Failed,
}

impl std::fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyStatus::Passed => write!(f, "Passed"),
            SurveyStatus::Warning => write!(f, "Warning"),
            SurveyStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Outcome of classifying one survey against its immediate predecessor.
///
/// Derived on demand from current chain state - never persisted, never stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    /// Overall verdict
    pub status: SurveyStatus,
    /// Human-readable dogleg severity, e.g. `"1.25°/100ft (Within limits)"`
    pub dogleg_description: String,
    /// Trend relative to the previous station
    pub trend_description: String,
    /// Recommended operator action
    pub recommendation: String,
}
