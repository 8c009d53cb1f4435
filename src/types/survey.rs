//! Survey station types
//!
//! `RawSurvey` is what an acquisition source delivers (manual entry, tabular
//! import, telemetry decoder). `Survey` is the committed station with chained
//! position state populated by the solver.

use serde::{Deserialize, Serialize};

/// Raw directional-survey station as delivered by an acquisition source.
///
/// Carries only what the tool measured; position state is derived when the
/// station is committed to a chain. Optional channels default to `None` so
/// partial telemetry records deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSurvey {
    /// Measured depth along the wellbore path (ft)
    pub md: f64,
    /// Inclination from true vertical (degrees, valid 0-180 inclusive)
    pub inc: f64,
    /// Azimuth compass heading (degrees, valid [0, 360))
    pub azi: f64,
    /// Bit depth at survey time (ft). When the tool does not report one it is
    /// defaulted to `md + plan.sensor_offset` at ingestion.
    #[serde(default)]
    pub bit_depth: Option<f64>,
    /// Total gravity field (g) - tool QC channel, passed through
    #[serde(default)]
    pub g_total: Option<f64>,
    /// Total magnetic field (µT) - tool QC channel, passed through
    #[serde(default)]
    pub b_total: Option<f64>,
    /// Magnetic dip angle (degrees) - tool QC channel, passed through
    #[serde(default)]
    pub dip_angle: Option<f64>,
    /// Tool face orientation (degrees), passed through
    #[serde(default)]
    pub tool_face: Option<f64>,
}

impl RawSurvey {
    /// Build a station from the three measured channels, leaving the
    /// optional tool channels empty.
    pub fn new(md: f64, inc: f64, azi: f64) -> Self {
        Self {
            md,
            inc,
            azi,
            bit_depth: None,
            g_total: None,
            b_total: None,
            dip_angle: None,
            tool_face: None,
        }
    }

    /// Same station with an explicit bit depth.
    pub fn with_bit_depth(mut self, bit_depth: f64) -> Self {
        self.bit_depth = Some(bit_depth);
        self
    }
}

/// A committed survey station with derived position state.
///
/// For `sequence_index` 1 the derived fields come from the station and the
/// well plan alone (dls = 0 by convention). For every later index they are a
/// pure function of this station, the previous station's derived state, and
/// the plan's proposed direction - which is why any edit upstream forces a
/// cascade recompute downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    /// Owning well identifier
    pub well_id: String,
    /// 1-based position in the chain; contiguous and ascending with MD
    pub sequence_index: usize,

    // === Measured channels ===
    /// Measured depth (ft)
    pub md: f64,
    /// Inclination from vertical (degrees)
    pub inc: f64,
    /// Azimuth heading (degrees, [0, 360))
    pub azi: f64,
    /// Bit depth at survey time (ft)
    pub bit_depth: f64,

    // === Derived position state ===
    /// True vertical depth (ft)
    pub tvd: f64,
    /// North/south displacement magnitude (ft, always >= 0)
    pub north_south: f64,
    /// Direction flag for `north_south` (true = north)
    pub is_north: bool,
    /// East/west displacement magnitude (ft, always >= 0)
    pub east_west: f64,
    /// Direction flag for `east_west` (true = east)
    pub is_east: bool,
    /// Vertical section: horizontal displacement projected onto the planned
    /// azimuth line (ft)
    pub vertical_section: f64,
    /// Dogleg severity (degrees per 100 ft); 0 for the first station
    pub dogleg_severity: f64,

    // === Pass-through tool channels ===
    #[serde(default)]
    pub g_total: Option<f64>,
    #[serde(default)]
    pub b_total: Option<f64>,
    #[serde(default)]
    pub dip_angle: Option<f64>,
    #[serde(default)]
    pub tool_face: Option<f64>,
}

impl Survey {
    /// North/south displacement with sign applied from the direction flag
    /// (positive = north).
    pub fn signed_north_south(&self) -> f64 {
        if self.is_north {
            self.north_south
        } else {
            -self.north_south
        }
    }

    /// East/west displacement with sign applied from the direction flag
    /// (positive = east).
    pub fn signed_east_west(&self) -> f64 {
        if self.is_east {
            self.east_west
        } else {
            -self.east_west
        }
    }

    /// The measured channels of this station as a raw tuple, e.g. for
    /// re-submitting an edited copy.
    pub fn to_raw(&self) -> RawSurvey {
        RawSurvey {
            md: self.md,
            inc: self.inc,
            azi: self.azi,
            bit_depth: Some(self.bit_depth),
            g_total: self.g_total,
            b_total: self.b_total,
            dip_angle: self.dip_angle,
            tool_face: self.tool_face,
        }
    }
}

impl Default for Survey {
    /// Deterministic zero-value suitable for tests.
    fn default() -> Self {
        Self {
            well_id: String::new(),
            sequence_index: 0,
            md: 0.0,
            inc: 0.0,
            azi: 0.0,
            bit_depth: 0.0,
            tvd: 0.0,
            north_south: 0.0,
            is_north: true,
            east_west: 0.0,
            is_east: true,
            vertical_section: 0.0,
            dogleg_severity: 0.0,
            g_total: None,
            b_total: None,
            dip_angle: None,
            tool_face: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_displacements() {
        let mut survey = Survey {
            north_south: 120.5,
            is_north: false,
            east_west: 40.25,
            is_east: true,
            ..Survey::default()
        };

        assert_eq!(survey.signed_north_south(), -120.5);
        assert_eq!(survey.signed_east_west(), 40.25);

        survey.is_north = true;
        survey.is_east = false;
        assert_eq!(survey.signed_north_south(), 120.5);
        assert_eq!(survey.signed_east_west(), -40.25);
    }

    #[test]
    fn test_raw_survey_optional_channels_default() {
        let raw: RawSurvey =
            serde_json::from_str(r#"{"md": 1250.45, "inc": 1.25, "azi": 175.82}"#)
                .expect("minimal tuple should deserialize");

        assert_eq!(raw.md, 1250.45);
        assert!(raw.bit_depth.is_none());
        assert!(raw.g_total.is_none());
        assert!(raw.tool_face.is_none());
    }

    #[test]
    fn test_to_raw_round_trip() {
        let survey = Survey {
            md: 1350.78,
            inc: 2.18,
            azi: 176.13,
            bit_depth: 1365.78,
            g_total: Some(0.999),
            ..Survey::default()
        };

        let raw = survey.to_raw();
        assert_eq!(raw.md, 1350.78);
        assert_eq!(raw.bit_depth, Some(1365.78));
        assert_eq!(raw.g_total, Some(0.999));
    }
}
