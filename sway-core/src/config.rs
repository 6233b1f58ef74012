//! Growth configuration.
//!
//! A plain parameter record read by the builder. Nothing in the simulation
//! writes to it.

use crate::error::{TreeError, TreeResult};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

/// Deepest `max_level` accepted by [`GrowthConfig::validate`].
pub const MAX_LEVEL_LIMIT: u32 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Width of the trunk's first node.
    pub branch_width: f32,
    /// Width multiplier applied at every growth step.
    pub branch_width_ratio: f32,
    /// Extra width multiplier applied to a newly split child.
    pub split_width_ratio: f32,
    /// Full range of the random per-step direction deviation, in radians.
    pub branch_deviation: f32,
    /// Base angle between a branch and a split child, in radians.
    pub branch_split_angle: f32,
    /// Full range of the random variation added to the split angle.
    pub branch_split_var: f32,
    /// Length of the trunk's first step.
    pub branch_length: f32,
    /// Length multiplier applied at every growth step.
    pub branch_length_ratio: f32,
    /// Carried for hosts that tune splitting; growth splits on a fixed
    /// node interval and does not read it.
    pub branch_split_proba: f32,
    /// See `branch_split_proba`.
    pub double_split_proba: f32,
    /// Constant bias blended into every growth direction, stronger on
    /// shorter steps.
    pub attraction: Vec2,
    /// Deepest split level.
    pub max_level: u32,
    /// Leaves hung from each branch, walking back from the tip.
    pub leaves_per_branch: usize,
    /// Upper bound on growth passes before giving up.
    pub max_growth_passes: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            branch_width: 80.0,
            branch_width_ratio: 0.95,
            split_width_ratio: 0.75,
            branch_deviation: 0.5,
            branch_split_angle: FRAC_PI_4,
            branch_split_var: 0.1,
            branch_length: 40.0,
            branch_length_ratio: 0.96,
            branch_split_proba: 0.5,
            double_split_proba: 0.0,
            attraction: Vec2::new(0.0, -0.5),
            max_level: 8,
            leaves_per_branch: 10,
            max_growth_passes: 10_000,
        }
    }
}

impl GrowthConfig {
    /// Parses a (possibly partial) TOML table; missing keys take their
    /// default values.
    pub fn from_toml_str(source: &str) -> TreeResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the ranges that keep growth finite and well defined.
    pub fn validate(&self) -> TreeResult<()> {
        fn invalid(msg: String) -> TreeResult<()> {
            Err(TreeError::InvalidConfig(msg))
        }

        if !(self.branch_width.is_finite() && self.branch_width > 0.0) {
            return invalid(format!("branch_width must be positive, got {}", self.branch_width));
        }
        if !(self.branch_length.is_finite() && self.branch_length > 0.0) {
            return invalid(format!("branch_length must be positive, got {}", self.branch_length));
        }
        if !(self.branch_width_ratio > 0.0 && self.branch_width_ratio < 1.0) {
            return invalid(format!(
                "branch_width_ratio must be in (0, 1), got {}",
                self.branch_width_ratio
            ));
        }
        if !(self.branch_length_ratio > 0.0 && self.branch_length_ratio < 1.0) {
            return invalid(format!(
                "branch_length_ratio must be in (0, 1), got {}",
                self.branch_length_ratio
            ));
        }
        if !(self.split_width_ratio > 0.0 && self.split_width_ratio.is_finite()) {
            return invalid(format!(
                "split_width_ratio must be positive, got {}",
                self.split_width_ratio
            ));
        }
        for (name, p) in [
            ("branch_split_proba", self.branch_split_proba),
            ("double_split_proba", self.double_split_proba),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must be in [0, 1], got {p}"));
            }
        }
        for (name, angle) in [
            ("branch_deviation", self.branch_deviation),
            ("branch_split_angle", self.branch_split_angle),
            ("branch_split_var", self.branch_split_var),
        ] {
            if !angle.is_finite() {
                return invalid(format!("{name} must be finite, got {angle}"));
            }
        }
        if self.max_level > MAX_LEVEL_LIMIT {
            return invalid(format!(
                "max_level must be at most {MAX_LEVEL_LIMIT}, got {}",
                self.max_level
            ));
        }
        if !self.attraction.is_finite() {
            return invalid(format!("attraction must be finite, got {}", self.attraction));
        }
        if self.max_growth_passes == 0 {
            return invalid("max_growth_passes must be at least 1".to_string());
        }
        Ok(())
    }
}
