//! Short-range trend projector
//!
//! Derives build and turn rates from the tail of a chain and extrapolates
//! the wellbore attitude a fixed distance ahead. Consumers use the result
//! to plan corrective steering and to auto-update planning fields after
//! every chain change.
//!
//! The window is the last 3 stations (or the whole chain when shorter);
//! rates are simple per-pair averages in degrees per 100 ft. Azimuth
//! deltas go through circular arithmetic so a trend across north does not
//! explode.

use crate::angles::{circular_delta, normalize_360};
use crate::types::{ProjectionResult, Survey};

/// Default look-ahead distance for a projection (ft of measured depth).
pub const DEFAULT_PROJECTION_HORIZON_FT: f64 = 100.0;

/// Number of trailing stations feeding the rate window.
const TREND_WINDOW_STATIONS: usize = 3;

/// Project the trajectory trend `horizon_ft` ahead of the last station.
///
/// Formula, over consecutive window pairs:
/// - buildRate = avg((inc_i - inc_i-1) * 100 / dMD)
/// - turnRate  = avg(circularDelta(azi_i-1, azi_i) * 100 / dMD)
/// - projectedInc = last.inc + buildRate * (horizon / 100)
/// - projectedAz  = normalize360(last.azi + turnRate * (horizon / 100))
///
/// The offset flags read the sign of the projected movement: building
/// inclination sets `is_above`, dropping sets `is_below`; a clockwise
/// projected heading sets `is_right`, counter-clockwise `is_left`.
///
/// Fewer than two stations is not an error: the current attitude (or
/// zero, for an empty chain) is carried forward with zero rates and all
/// flags false. The projected inclination is deliberately not clamped to
/// the valid survey range; an extrapolation past vertical is information
/// for the directional driller, not a measurement to validate.
pub fn project(surveys: &[Survey], horizon_ft: f64) -> ProjectionResult {
    let last = match surveys {
        [] => return ProjectionResult::default(),
        [only] => {
            return ProjectionResult {
                projected_inc: only.inc,
                projected_az: only.azi,
                ..ProjectionResult::default()
            }
        }
        [.., last] => last,
    };

    let window = &surveys[surveys.len().saturating_sub(TREND_WINDOW_STATIONS)..];

    let mut build_sum = 0.0;
    let mut turn_sum = 0.0;
    for pair in window.windows(2) {
        // dMD > 0 is a chain invariant (strictly ascending md)
        let delta_md = pair[1].md - pair[0].md;
        build_sum += (pair[1].inc - pair[0].inc) * 100.0 / delta_md;
        turn_sum += circular_delta(pair[0].azi, pair[1].azi) * 100.0 / delta_md;
    }
    let pairs = (window.len() - 1) as f64;
    let build_rate = build_sum / pairs;
    let turn_rate = turn_sum / pairs;

    let scale = horizon_ft / 100.0;
    let projected_inc = last.inc + build_rate * scale;
    let projected_az = normalize_360(last.azi + turn_rate * scale);

    let inc_delta = projected_inc - last.inc;
    let az_delta = circular_delta(last.azi, projected_az);

    ProjectionResult {
        projected_inc,
        projected_az,
        build_rate,
        turn_rate,
        is_above: inc_delta > 0.0,
        is_below: inc_delta < 0.0,
        is_left: az_delta < 0.0,
        is_right: az_delta > 0.0,
    }
}
