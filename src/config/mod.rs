//! Well Plan Configuration
//!
//! Loads the per-well directional plan from TOML, replacing hardcoded
//! targets with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `WELLPATH_PLAN` environment variable (path to TOML file)
//! 2. `well_plan.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded [`WellPlan`] is passed explicitly into chain and store
//! operations; there is no process-wide plan singleton.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::WellPlan;

/// Environment variable naming an explicit plan file.
pub const PLAN_ENV_VAR: &str = "WELLPATH_PLAN";

/// Plan file searched for in the working directory.
pub const PLAN_FILE_NAME: &str = "well_plan.toml";

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Plan I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Plan parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Plan serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Plan validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading / Validation
// ============================================================================

impl WellPlan {
    /// Load a plan using the standard search order:
    /// 1. `$WELLPATH_PLAN` environment variable
    /// 2. `./well_plan.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(PLAN_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(plan) => {
                        info!(path = %p.display(), "Loaded well plan from WELLPATH_PLAN");
                        return plan;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load plan from WELLPATH_PLAN, falling back");
                    }
                }
            } else {
                warn!(path = %path, "WELLPATH_PLAN points to non-existent file, falling back");
            }
        }

        // 2. Check ./well_plan.toml
        let local = PathBuf::from(PLAN_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(plan) => {
                    info!("Loaded well plan from ./well_plan.toml");
                    return plan;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./well_plan.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No well_plan.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let plan: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Serialize the plan to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save the plan to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Well plan saved");
        Ok(())
    }

    /// Validate the plan for internal consistency.
    ///
    /// Rules:
    /// - `proposed_direction` must be a finite angle in [0, 360) degrees
    /// - `sensor_offset` and `proposed_vertical_section` must be finite and >= 0
    /// - `target_tvd` must be finite and > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        // NaN fails the range check too, so non-finite values cannot sneak
        // through the comparisons below.
        if !self.proposed_direction.is_finite() || !(0.0..360.0).contains(&self.proposed_direction)
        {
            errors.push(format!(
                "proposed_direction ({}) must be a finite angle in [0, 360) degrees",
                self.proposed_direction
            ));
        }
        if !self.sensor_offset.is_finite() || self.sensor_offset < 0.0 {
            errors.push(format!(
                "sensor_offset ({}) must be a finite non-negative distance",
                self.sensor_offset
            ));
        }
        if !self.target_tvd.is_finite() || self.target_tvd <= 0.0 {
            errors.push(format!(
                "target_tvd ({}) must be a finite positive depth",
                self.target_tvd
            ));
        }
        if !self.proposed_vertical_section.is_finite() || self.proposed_vertical_section < 0.0 {
            errors.push(format!(
                "proposed_vertical_section ({}) must be a finite non-negative distance",
                self.proposed_vertical_section
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
