//! Trend projection types

use serde::{Deserialize, Serialize};

/// Short-range forward projection of the wellbore trend.
///
/// Derived from the last few stations of a chain; never persisted. A chain
/// with fewer than two stations yields the neutral default (zero rates, the
/// last station's angles carried forward, all offset flags false).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectionResult {
    /// Projected inclination at the horizon (degrees)
    pub projected_inc: f64,
    /// Projected azimuth at the horizon (degrees, [0, 360))
    pub projected_az: f64,
    /// Windowed inclination change rate (degrees per 100 ft)
    pub build_rate: f64,
    /// Windowed azimuth change rate (degrees per 100 ft, signed - positive
    /// turns clockwise)
    pub turn_rate: f64,
    /// Trajectory is building inclination (heading above the current line)
    pub is_above: bool,
    /// Trajectory is dropping inclination
    pub is_below: bool,
    /// Trajectory is turning left (counter-clockwise)
    pub is_left: bool,
    /// Trajectory is turning right (clockwise)
    pub is_right: bool,
}
