use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Tunables of the slash and merge protocols.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Net area below which a fragment is discarded.
    pub min_area: f64,
    /// Half length of the line a drag gesture is extended to.
    pub slash_extent: f64,
    /// Ticks a slash stays visible.
    pub slash_lifetime: u32,
    /// Impulse numerator; divided by the clamped body mass.
    pub slash_power: f64,
    /// Weight of the cut direction against the away-from-line direction.
    pub slash_along_ratio: f64,
    pub merge_area_ratio_min: f64,
    pub merge_area_ratio_max: f64,
    /// Chance per tick that an eligible pair fuses.
    pub merge_probability: f64,
    /// Contact time in milliseconds before a pair is considered.
    pub merge_min_contact_duration: f64,
    /// Also require the outlines to lap along an edge.
    pub merge_requires_shared_edge: bool,
    /// Smallest vertex count of a merged shape (inclusive).
    pub merge_min_vertices: usize,
    /// Largest vertex count of a merged shape (exclusive).
    pub merge_max_vertices: usize,
    /// Distance within which two edges count as lapped.
    pub lap_threshold: f64,
    /// Seed for merge randomness; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_area: 1.0,
            slash_extent: 4000.0,
            slash_lifetime: 60,
            slash_power: 3.0,
            slash_along_ratio: 0.3,
            merge_area_ratio_min: 0.6,
            merge_area_ratio_max: 1.4,
            merge_probability: 0.01,
            merge_min_contact_duration: 1000.0,
            merge_requires_shared_edge: false,
            merge_min_vertices: 3,
            merge_max_vertices: 16,
            lap_threshold: 1.0,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document, filling missing fields with defaults, and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> { Err(ConfigError::Invalid(msg.to_owned()).into()) };
        let positive = |v: f64| v > 0.0 && v.is_finite();
        if self.min_area.is_nan() || self.min_area < 0.0 {
            return invalid("min_area must be non-negative");
        }
        if !positive(self.slash_extent) {
            return invalid("slash_extent must be positive");
        }
        if !(0.0..=1.0).contains(&self.merge_probability) {
            return invalid("merge_probability must lie in [0, 1]");
        }
        if !positive(self.merge_area_ratio_min) || self.merge_area_ratio_min > self.merge_area_ratio_max
        {
            return invalid("merge area ratio bounds must satisfy 0 < min <= max");
        }
        if self.merge_min_vertices < 3 || self.merge_min_vertices >= self.merge_max_vertices {
            return invalid("merge vertex range must satisfy 3 <= min < max");
        }
        if !positive(self.lap_threshold) {
            return invalid("lap_threshold must be positive");
        }
        Ok(())
    }
}
