use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tuning knobs for [`AdaptiveVad`](super::AdaptiveVad).
///
/// Values are expressed in normalized volume units (`[0.0, 1.0]` RMS) and milliseconds.
/// Deserializing fills any missing field from [`DEFAULT_ADAPTIVE_CONFIG`], so a config file
/// only needs to name the knobs it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveVadConfig {
    /// When `false`, the detector skips calibration and noise tracking and compares samples
    /// against its current threshold as-is.
    pub enabled: bool,

    /// Multiplier applied to the noise floor to derive the detection threshold.
    pub snr_factor: f32,

    /// Number of steady-state samples kept for the percentile correction (~5s at 50ms/sample).
    pub history_size: usize,

    /// Half-width of the dead zone around the threshold.
    pub hysteresis: f32,

    /// How long the calibration phase collects ambient samples.
    pub calibration_duration_ms: u64,

    /// Percentile of the history buffer used as the "historical" noise floor.
    pub noise_percentile: f32,

    /// Lower clamp for the adaptive threshold.
    pub min_threshold: f32,

    /// Upper clamp for the adaptive threshold.
    pub max_threshold: f32,

    /// Smoothing weight kept from the previous noise floor when the level rises.
    pub noise_decay_factor: f32,
}

/// Defaults tuned for ~50ms RMS frames from a browser or desktop microphone.
pub const DEFAULT_ADAPTIVE_CONFIG: AdaptiveVadConfig = AdaptiveVadConfig {
    enabled: true,
    snr_factor: 2.5,
    history_size: 100,
    hysteresis: 0.015,
    calibration_duration_ms: 2000,
    noise_percentile: 0.1,
    min_threshold: 0.04,
    max_threshold: 0.25,
    noise_decay_factor: 0.95,
};

impl Default for AdaptiveVadConfig {
    fn default() -> Self {
        DEFAULT_ADAPTIVE_CONFIG
    }
}

impl AdaptiveVadConfig {
    pub fn calibration_duration(&self) -> Duration {
        Duration::from_millis(self.calibration_duration_ms)
    }

    /// Clamp a raw `noise_floor * snr_factor` product into `[min_threshold, max_threshold]`.
    pub fn clamp_threshold(&self, raw: f32) -> f32 {
        raw.clamp(self.min_threshold, self.max_threshold)
    }

    /// Check the invariants the detector relies on.
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("snr_factor", self.snr_factor),
            ("hysteresis", self.hysteresis),
            ("noise_percentile", self.noise_percentile),
            ("min_threshold", self.min_threshold),
            ("max_threshold", self.max_threshold),
            ("noise_decay_factor", self.noise_decay_factor),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::invalid_config(format!("{name} must be finite")));
        }

        if self.snr_factor <= 0.0 {
            return Err(Error::invalid_config("snr_factor must be positive"));
        }
        if self.history_size == 0 {
            return Err(Error::invalid_config("history_size must be at least 1"));
        }
        if self.hysteresis < 0.0 {
            return Err(Error::invalid_config("hysteresis must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.noise_percentile) {
            return Err(Error::invalid_config(
                "noise_percentile must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.noise_decay_factor) {
            return Err(Error::invalid_config(
                "noise_decay_factor must be within [0, 1]",
            ));
        }
        if self.min_threshold > self.max_threshold {
            return Err(Error::invalid_config(format!(
                "min_threshold ({}) exceeds max_threshold ({})",
                self.min_threshold, self.max_threshold
            )));
        }

        Ok(())
    }

    /// Return a copy with every `Some` field of `update` applied.
    pub fn merged(&self, update: &AdaptiveVadConfigUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            snr_factor: update.snr_factor.unwrap_or(self.snr_factor),
            history_size: update.history_size.unwrap_or(self.history_size),
            hysteresis: update.hysteresis.unwrap_or(self.hysteresis),
            calibration_duration_ms: update
                .calibration_duration_ms
                .unwrap_or(self.calibration_duration_ms),
            noise_percentile: update.noise_percentile.unwrap_or(self.noise_percentile),
            min_threshold: update.min_threshold.unwrap_or(self.min_threshold),
            max_threshold: update.max_threshold.unwrap_or(self.max_threshold),
            noise_decay_factor: update.noise_decay_factor.unwrap_or(self.noise_decay_factor),
        }
    }
}

/// A partial [`AdaptiveVadConfig`]; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveVadConfigUpdate {
    pub enabled: Option<bool>,
    pub snr_factor: Option<f32>,
    pub history_size: Option<usize>,
    pub hysteresis: Option<f32>,
    pub calibration_duration_ms: Option<u64>,
    pub noise_percentile: Option<f32>,
    pub min_threshold: Option<f32>,
    pub max_threshold: Option<f32>,
    pub noise_decay_factor: Option<f32>,
}
