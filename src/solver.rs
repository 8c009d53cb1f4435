//! Station-to-station position solver
//!
//! Pure trajectory math: given one survey station and the derived state of
//! its predecessor, compute the station's position and curvature fields.
//! Everything here is total over validated input (monotonic MD, angles in
//! range) and does no I/O; validation lives in the chain manager.
//!
//! Calculations:
//! - TVD increment from the current station's inclination
//! - N/S and E/W displacement carried as (magnitude, direction flag)
//! - Vertical section projected onto the planned azimuth line
//! - Dogleg severity via the spherical law of cosines

use crate::angles::circular_delta;
use crate::types::{RawSurvey, Survey};

/// Derived position fields for one station, ready to commit to the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedPosition {
    pub tvd: f64,
    /// Magnitude of the north/south displacement, always >= 0.
    pub north_south: f64,
    pub is_north: bool,
    /// Magnitude of the east/west displacement, always >= 0.
    pub east_west: f64,
    pub is_east: bool,
    pub vertical_section: f64,
    /// Degrees per 100 ft of measured depth.
    pub dogleg_severity: f64,
}

// ============================================================================
// Chained Solve
// ============================================================================

/// Solve one station against its predecessor's committed state.
///
/// Requires `current.md > previous.md`; the chain manager rejects anything
/// else before this is reached. Only the current station's inclination
/// feeds the TVD increment (not the average of both stations, which a
/// full minimum-curvature method would use):
///
/// Formula:
/// - tvd = prev.tvd + dMD * cos(inc)
/// - nsDelta = dMD * sin(inc) * cos(azi); ewDelta = dMD * sin(inc) * sin(azi)
/// - vs = |ns * sin(plan) + ew * cos(plan)|
/// - dogleg = acos(cos(i1)cos(i2) + sin(i1)sin(i2)cos(dAzi)); dls = dogleg * 100 / dMD
///
/// N/S and E/W are kept as a magnitude plus a hemisphere flag; the signed
/// running total is reconstructed, incremented, and re-split so a station
/// can walk the trace across the origin without losing direction.
pub fn solve(current: &RawSurvey, previous: &Survey, proposed_direction: f64) -> SolvedPosition {
    let delta_md = current.md - previous.md;
    let inc_rad = current.inc.to_radians();
    let azi_rad = current.azi.to_radians();

    let tvd = previous.tvd + delta_md * inc_rad.cos();

    let horizontal = delta_md * inc_rad.sin();
    let ns_signed = previous.signed_north_south() + horizontal * azi_rad.cos();
    let ew_signed = previous.signed_east_west() + horizontal * azi_rad.sin();

    let north_south = ns_signed.abs();
    let is_north = ns_signed >= 0.0;
    let east_west = ew_signed.abs();
    let is_east = ew_signed >= 0.0;

    let plan_rad = proposed_direction.to_radians();
    let vertical_section = (north_south * plan_rad.sin() + east_west * plan_rad.cos()).abs();

    let dogleg_severity = dogleg_severity(
        previous.inc,
        previous.azi,
        current.inc,
        current.azi,
        delta_md,
    );

    SolvedPosition {
        tvd,
        north_south,
        is_north,
        east_west,
        is_east,
        vertical_section,
        dogleg_severity,
    }
}

/// Solve the first station of a well.
///
/// There is no predecessor, so the station is solved against an implicit
/// zero-state anchor at md = 0: TVD and displacements come from the
/// station's own inc/azi over its full measured depth, and dogleg
/// severity is 0 by convention.
pub fn solve_first(current: &RawSurvey, proposed_direction: f64) -> SolvedPosition {
    let anchor = Survey::default();
    let mut solved = solve(current, &anchor, proposed_direction);
    solved.dogleg_severity = 0.0;
    solved
}

// ============================================================================
// Dogleg Severity
// ============================================================================

/// Curvature between two attitude vectors, in degrees per 100 ft.
///
/// Spherical law of cosines on the (inc, azi) unit vectors; the azimuth
/// difference goes through `circular_delta` so a 350 -> 10 turn reads as
/// 20 degrees. The dot product is clamped before acos to absorb float
/// drift at near-parallel attitudes.
fn dogleg_severity(inc_prev: f64, azi_prev: f64, inc_cur: f64, azi_cur: f64, delta_md: f64) -> f64 {
    let i1 = inc_prev.to_radians();
    let i2 = inc_cur.to_radians();
    let d_azi = circular_delta(azi_prev, azi_cur).to_radians();

    let dot = (i1.cos() * i2.cos() + i1.sin() * i2.sin() * d_azi.cos()).clamp(-1.0, 1.0);
    let dogleg_deg = dot.acos().to_degrees();

    dogleg_deg * 100.0 / delta_md
}
