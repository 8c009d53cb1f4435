//! Circular-angle arithmetic for azimuth handling
//!
//! Azimuth is a compass quantity on [0, 360): 359° and 1° are two degrees
//! apart, not 358. Every azimuth comparison in the trajectory math goes
//! through these helpers so the wrap boundary never leaks into a plain
//! subtraction:
//! - `normalize_360`: wrap any angle into [0, 360)
//! - `circular_delta`: signed shortest arc between two headings
//! - `circular_mean`: unit-vector average of a set of headings

// ============================================================================
// Normalization
// ============================================================================

/// Wrap an angle in degrees into [0, 360).
///
/// Handles arbitrarily large magnitudes in either direction:
/// `normalize_360(725.0) == 5.0`, `normalize_360(-90.0) == 270.0`.
pub fn normalize_360(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

// ============================================================================
// Signed Shortest Delta
// ============================================================================

/// Signed shortest angular distance from `a` to `b`, in degrees.
///
/// Result is in (-180, 180]: positive means `b` lies clockwise of `a`,
/// negative counter-clockwise. The antipodal case resolves to +180.
///
/// Formula: d = ((b - a) mod 360), folded into (-180, 180]
///
/// `circular_delta(350.0, 10.0) == 20.0` while a naive subtraction
/// would report -340.
pub fn circular_delta(a: f64, b: f64) -> f64 {
    let mut delta = (b - a) % 360.0;
    if delta < 0.0 {
        delta += 360.0;
    }
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

// ============================================================================
// Circular Mean
// ============================================================================

/// Mean heading of a set of angles in degrees, normalized to [0, 360).
///
/// Sums the unit vectors of each angle and takes the atan2 of the result,
/// so headings straddling the wrap boundary average correctly:
/// mean of [350, 10] is ~0, not 180.
///
/// An empty slice returns 0.0. Degenerate inputs whose vectors cancel
/// exactly (e.g. [0, 180]) resolve to whatever atan2 reports for the
/// near-zero resultant; callers needing to distinguish that case should
/// check dispersion separately.
pub fn circular_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    for &v in values {
        let rad = v.to_radians();
        sin_sum += rad.sin();
        cos_sum += rad.cos();
    }

    normalize_360(sin_sum.atan2(cos_sum).to_degrees())
}
