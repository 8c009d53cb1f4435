//! Per-survey quality classifier
//!
//! An explicit ordered rule table, evaluated top to bottom, first match
//! wins. It looks at one survey and its immediate predecessor only; the
//! whole-chain view belongs to the analytics aggregator.
//!
//! Rules, in precedence order:
//! 1. dogleg severity over the failure limit -> Failed
//! 2. normalized inclination change over the warning limit -> Warning
//! 3. otherwise -> Passed

use crate::types::{QualityVerdict, Survey, SurveyStatus};

/// Rule thresholds for the classifier.
pub mod quality_rules {
    /// Dogleg severity above this fails the survey (deg/100ft)
    pub const RULE_DLS_FAILED: f64 = 3.0;
    /// Dogleg severity above this reads as high in the description (deg/100ft)
    pub const RULE_DLS_HIGH: f64 = 2.0;
    /// Normalized inclination change above this warrants a warning (deg/100ft)
    pub const RULE_INC_CHANGE_WARNING: f64 = 2.0;
}

/// Classify one survey against its immediate predecessor.
///
/// The first survey of a well has nothing to trend against and always
/// passes. For later stations the inclination change is normalized to
/// degrees per 100 ft over the station interval before comparison, so a
/// short interval cannot hide a sharp build.
pub fn classify(current: &Survey, previous: Option<&Survey>) -> QualityVerdict {
    use quality_rules::*;

    let dogleg_description = dogleg_description(current.dogleg_severity);

    let previous = match previous {
        Some(p) => p,
        None => {
            return QualityVerdict {
                status: SurveyStatus::Passed,
                dogleg_description,
                trend_description: "N/A - first survey".to_string(),
                recommendation: "Continue as planned".to_string(),
            }
        }
    };

    if current.dogleg_severity > RULE_DLS_FAILED {
        return QualityVerdict {
            status: SurveyStatus::Failed,
            dogleg_description,
            trend_description: "Dogleg severity above acceptable limit".to_string(),
            recommendation: "Reduce dogleg severity".to_string(),
        };
    }

    let inc_change = (current.inc - previous.inc) * 100.0 / (current.md - previous.md);
    if inc_change.abs() > RULE_INC_CHANGE_WARNING {
        return QualityVerdict {
            status: SurveyStatus::Warning,
            dogleg_description,
            trend_description: "Excessive inclination change".to_string(),
            recommendation: "Monitor inclination build rate".to_string(),
        };
    }

    QualityVerdict {
        status: SurveyStatus::Passed,
        dogleg_description,
        trend_description: "Consistent with build plan".to_string(),
        recommendation: "Continue as planned".to_string(),
    }
}

fn dogleg_description(dls: f64) -> String {
    use quality_rules::RULE_DLS_HIGH;

    if dls <= RULE_DLS_HIGH {
        format!("{dls:.2}°/100ft (Within limits)")
    } else {
        format!("{dls:.2}°/100ft (High)")
    }
}
