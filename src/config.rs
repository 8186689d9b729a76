//! Tuning constants for the autocorrelation detector.
//!
//! The defaults were tuned by ear against real instruments. Changing any of
//! them changes which windows are accepted and where the period lands, so
//! they are kept as named constants and collected in [`DetectorConfig`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Windows whose RMS amplitude falls below this are treated as silence.
pub const RMS_THRESHOLD: f64 = 0.01;

/// Minimum similarity score for a lag to count as a candidate period.
pub const GOOD_ENOUGH_CORRELATION: f64 = 0.9;

/// Multiplier applied to the neighbour-difference shift when refining the best lag.
pub const INTERPOLATION_FACTOR: f64 = 8.0;

/// Best score an exhausted scan must beat to still report a pitch.
pub const MIN_CORRELATION: f64 = 0.01;

/// Thresholds used by [`AutocorrelationDetector`](crate::detector::autocorrelation::AutocorrelationDetector).
///
/// # Example
/// ```
/// use pitchdetect::DetectorConfig;
///
/// let config = DetectorConfig::default().with_rms_threshold(0.02);
/// assert_eq!(config.good_enough_correlation, 0.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// RMS gate below which a window is not analysed
    pub rms_threshold: f64,

    /// Similarity a rising lag must exceed to be a candidate
    pub good_enough_correlation: f64,

    /// Scale of the sub-sample shift applied to the best lag
    pub interpolation_factor: f64,

    /// Floor for the best score of a scan that never short-circuits
    pub min_correlation: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            rms_threshold: RMS_THRESHOLD,
            good_enough_correlation: GOOD_ENOUGH_CORRELATION,
            interpolation_factor: INTERPOLATION_FACTOR,
            min_correlation: MIN_CORRELATION,
        }
    }
}

impl DetectorConfig {
    /// Set the RMS gate.
    pub fn with_rms_threshold(mut self, rms_threshold: f64) -> Self {
        self.rms_threshold = rms_threshold;
        self
    }

    /// Set the candidate correlation threshold.
    pub fn with_good_enough_correlation(mut self, good_enough_correlation: f64) -> Self {
        self.good_enough_correlation = good_enough_correlation;
        self
    }

    /// Set the interpolation multiplier.
    pub fn with_interpolation_factor(mut self, interpolation_factor: f64) -> Self {
        self.interpolation_factor = interpolation_factor;
        self
    }

    /// Set the exhausted-scan floor.
    pub fn with_min_correlation(mut self, min_correlation: f64) -> Self {
        self.min_correlation = min_correlation;
        self
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DetectorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("rms_threshold", self.rms_threshold),
            ("good_enough_correlation", self.good_enough_correlation),
            ("min_correlation", self.min_correlation),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(name, value, "must be finite and non-negative"));
            }
        }
        if !self.interpolation_factor.is_finite() {
            return Err(Error::invalid(
                "interpolation_factor",
                self.interpolation_factor,
                "must be finite",
            ));
        }
        Ok(())
    }
}
