//! Well plan parameters
//!
//! The plan is an immutable input to every solve/aggregate call. There is no
//! ambient "current well" - callers pass the plan explicitly.

use serde::{Deserialize, Serialize};

/// Planned trajectory parameters for a well.
///
/// Loaded from `well_plan.toml` via the [`config`](crate::config) module or
/// built directly. Every field participates in the computation chain:
/// `proposed_direction` in vertical-section projection, `sensor_offset` in
/// bit-depth defaulting at ingestion, `target_tvd` and
/// `proposed_vertical_section` in on-target scoring and risk rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellPlan {
    /// Planned azimuth line for vertical-section projection (degrees, [0, 360))
    #[serde(default)]
    pub proposed_direction: f64,

    /// Distance from the directional sensor back to the bit (ft). Used to
    /// default `bit_depth` to `md + sensor_offset` for tuples that omit it.
    #[serde(default)]
    pub sensor_offset: f64,

    /// Planned true vertical depth of the target (ft)
    #[serde(default = "default_target_tvd")]
    pub target_tvd: f64,

    /// Planned vertical section at target (ft)
    #[serde(default)]
    pub proposed_vertical_section: f64,
}

fn default_target_tvd() -> f64 {
    10_000.0
}

impl Default for WellPlan {
    fn default() -> Self {
        Self {
            proposed_direction: 0.0,
            sensor_offset: 0.0,
            target_tvd: default_target_tvd(),
            proposed_vertical_section: 0.0,
        }
    }
}
