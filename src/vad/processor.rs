use std::collections::VecDeque;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use super::config::{AdaptiveVadConfig, AdaptiveVadConfigUpdate, DEFAULT_ADAPTIVE_CONFIG};
use super::stats::{clamp_unit, sorted_percentile};
use crate::Result;

/// Noise floor used when calibration ends without a single sample.
pub const FALLBACK_NOISE_FLOOR: f32 = 0.05;

/// Bounds for [`AdaptiveVad::set_noise_floor`].
pub const NOISE_FLOOR_OVERRIDE_RANGE: (f32, f32) = (0.01, 0.5);

/// History length required before the percentile correction kicks in.
const CORRECTION_MIN_HISTORY: usize = 20;

/// The percentile correction runs on every Nth steady-state sample.
const CORRECTION_INTERVAL: u64 = 10;

/// Weight kept from the tracked noise floor when blending in the historical percentile.
const CORRECTION_KEEP_WEIGHT: f32 = 0.7;

/// Per-sample decay applied to `peak_level` when the level does not exceed it.
const PEAK_DECAY: f32 = 0.99;

/// Snapshot of the detector's running estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdaptiveVadState {
    /// Running estimate of the ambient background level.
    pub noise_floor: f32,

    /// Slow-decaying running peak. Diagnostic only; it never feeds the speech decision.
    pub peak_level: f32,

    /// Current threshold, always within `[min_threshold, max_threshold]`.
    pub adaptive_threshold: f32,

    pub is_calibrated: bool,

    /// Debounced speech decision.
    pub is_speaking: bool,
}

/// State every detector starts from (and returns to on [`AdaptiveVad::reset`]).
pub const INITIAL_VAD_STATE: AdaptiveVadState = AdaptiveVadState {
    noise_floor: 0.08,
    peak_level: 0.08,
    adaptive_threshold: 0.12,
    is_calibrated: false,
    is_speaking: false,
};

impl Default for AdaptiveVadState {
    fn default() -> Self {
        INITIAL_VAD_STATE
    }
}

/// Per-sample output of [`AdaptiveVad::process_volume`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VadDecision {
    pub threshold: f32,
    pub is_voice: bool,
    pub noise_floor: f32,
    pub is_calibrating: bool,
}

/// Energy-based voice activity detector that calibrates itself to the room.
///
/// Feed it one scalar volume level per audio frame (typically the RMS of a ~50ms window).
/// The detector first learns the ambient level during a calibration window, then tracks the
/// noise floor (fast down, slow up, with a periodic low-percentile correction) and reports a
/// debounced speaking flag with hysteresis around `noise_floor * snr_factor`.
///
/// One instance serves one listening session; it is not meant to be shared across threads
/// without external synchronization.
#[derive(Debug, Clone)]
pub struct AdaptiveVad {
    config: AdaptiveVadConfig,
    state: AdaptiveVadState,

    // Steady-state samples, oldest first, bounded by `config.history_size`.
    history: VecDeque<f32>,

    // Steady-state samples pushed since the last reset; paces the percentile correction.
    history_pushes: u64,

    // Samples collected while calibrating; dropped once calibration finishes.
    calibration_samples: Vec<f32>,

    // `None` means calibration was never started; it then counts as already elapsed.
    calibration_started_at: Option<Instant>,

    warned_out_of_range: bool,
}

impl Default for AdaptiveVad {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveVad {
    /// Create a detector with [`DEFAULT_ADAPTIVE_CONFIG`].
    pub fn new() -> Self {
        Self::from_valid_config(DEFAULT_ADAPTIVE_CONFIG)
    }

    /// Create a detector with a custom configuration.
    pub fn with_config(config: AdaptiveVadConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: AdaptiveVadConfig) -> Self {
        Self {
            config,
            state: INITIAL_VAD_STATE,
            history: VecDeque::new(),
            history_pushes: 0,
            calibration_samples: Vec::new(),
            calibration_started_at: None,
            warned_out_of_range: false,
        }
    }

    pub fn config(&self) -> &AdaptiveVadConfig {
        &self.config
    }

    /// Copy of the current running estimates.
    pub fn state(&self) -> AdaptiveVadState {
        self.state
    }

    /// Merge `update` into the configuration. Takes effect on the next processed sample.
    ///
    /// On error the previous configuration stays in place.
    pub fn update_config(&mut self, update: &AdaptiveVadConfigUpdate) -> Result<()> {
        let merged = self.config.merged(update);
        merged.validate()?;
        self.config = merged;
        Ok(())
    }

    /// Begin the calibration phase now.
    pub fn start_calibration(&mut self) {
        self.start_calibration_at(Instant::now());
    }

    /// Begin the calibration phase at `now`.
    ///
    /// Steady-state estimates are left untouched until calibration finishes.
    pub fn start_calibration_at(&mut self, now: Instant) {
        self.calibration_started_at = Some(now);
        self.calibration_samples.clear();
        self.state.is_calibrated = false;
    }

    pub fn is_calibration_complete(&self) -> bool {
        self.is_calibration_complete_at(Instant::now())
    }

    /// True once calibrated, or once more than `calibration_duration_ms` has passed since
    /// calibration started.
    pub fn is_calibration_complete_at(&self, now: Instant) -> bool {
        if self.state.is_calibrated {
            return true;
        }

        match self.calibration_started_at {
            Some(started) => {
                now.saturating_duration_since(started) > self.config.calibration_duration()
            }
            None => true,
        }
    }

    /// Derive the noise floor from the median calibration sample and leave calibration.
    ///
    /// The median keeps a cough or door slam during calibration from inflating the floor.
    pub fn finish_calibration(&mut self) {
        let collected = self.calibration_samples.len();
        let median = sorted_percentile(self.calibration_samples.drain(..), 0.5);

        let noise_floor = median.unwrap_or_else(|| {
            warn!(
                fallback = FALLBACK_NOISE_FLOOR,
                "VAD calibration finished without samples; audio source may be silent or broken"
            );
            FALLBACK_NOISE_FLOOR
        });

        self.state.noise_floor = noise_floor;
        self.recompute_threshold();
        self.state.is_calibrated = true;
        self.calibration_samples = Vec::new();

        debug!(
            noise_floor,
            threshold = self.state.adaptive_threshold,
            samples = collected,
            "VAD calibration complete"
        );
    }

    /// Process one volume level using the wall clock for calibration timing.
    pub fn process_volume(&mut self, sample: f32) -> VadDecision {
        self.process_volume_at(sample, Instant::now())
    }

    /// Process one volume level observed at `now`.
    ///
    /// Samples are expected in `[0.0, 1.0]`; anything else (including NaN) is clamped.
    pub fn process_volume_at(&mut self, sample: f32, now: Instant) -> VadDecision {
        let sample = self.sanitize(sample);

        if !self.config.enabled {
            let is_voice = self.apply_hysteresis(sample);
            return self.decision(is_voice, false);
        }

        if !self.state.is_calibrated {
            self.calibration_samples.push(sample);
            if self.is_calibration_complete_at(now) {
                self.finish_calibration();
            }
            // No detections until the noise floor is known.
            return self.decision(false, !self.state.is_calibrated);
        }

        self.push_history(sample);
        self.update_noise_floor(sample);
        self.update_peak(sample);
        self.recompute_threshold();

        let is_voice = self.apply_hysteresis(sample);
        self.decision(is_voice, false)
    }

    /// Return state and buffers to their initial values. The configuration is kept.
    pub fn reset(&mut self) {
        self.state = INITIAL_VAD_STATE;
        self.history.clear();
        self.history_pushes = 0;
        self.calibration_samples.clear();
        self.calibration_started_at = None;
        self.warned_out_of_range = false;
    }

    /// Override the noise floor (clamped to `[0.01, 0.5]`) and recompute the threshold.
    pub fn set_noise_floor(&mut self, value: f32) {
        let (lo, hi) = NOISE_FLOOR_OVERRIDE_RANGE;
        self.state.noise_floor = if value.is_finite() {
            value.clamp(lo, hi)
        } else {
            lo
        };
        self.recompute_threshold();
    }

    fn sanitize(&mut self, sample: f32) -> f32 {
        let (clamped, changed) = clamp_unit(sample);
        if changed && !self.warned_out_of_range {
            warn!(sample, clamped, "volume sample outside [0, 1]; clamping");
            self.warned_out_of_range = true;
        }
        clamped
    }

    fn push_history(&mut self, sample: f32) {
        self.history.push_back(sample);
        while self.history.len() > self.config.history_size {
            self.history.pop_front();
        }
        self.history_pushes += 1;
    }

    fn update_noise_floor(&mut self, sample: f32) {
        let decay = self.config.noise_decay_factor;

        // Follow silence immediately; follow rising levels slowly so speech
        // doesn't drag the floor up with it.
        if sample < self.state.noise_floor {
            self.state.noise_floor = sample;
        } else {
            self.state.noise_floor = decay * self.state.noise_floor + (1.0 - decay) * sample;
        }

        // Anchor the exponential tracking to a low percentile of recent history.
        if self.history.len() < CORRECTION_MIN_HISTORY
            || self.history_pushes % CORRECTION_INTERVAL != 0
        {
            return;
        }

        if let Some(historical) =
            sorted_percentile(self.history.iter().copied(), self.config.noise_percentile)
        {
            self.state.noise_floor = self.state.noise_floor * CORRECTION_KEEP_WEIGHT
                + historical * (1.0 - CORRECTION_KEEP_WEIGHT);
        }
    }

    fn update_peak(&mut self, sample: f32) {
        if sample > self.state.peak_level {
            self.state.peak_level = sample;
        } else {
            self.state.peak_level = self.state.peak_level * PEAK_DECAY + sample * (1.0 - PEAK_DECAY);
        }
    }

    fn recompute_threshold(&mut self) {
        self.state.adaptive_threshold = self
            .config
            .clamp_threshold(self.state.noise_floor * self.config.snr_factor);
    }

    /// Flip the speaking flag only once the sample leaves the dead zone
    /// `[threshold - hysteresis, threshold + hysteresis]`.
    fn apply_hysteresis(&mut self, sample: f32) -> bool {
        let threshold = self.state.adaptive_threshold;
        let band = self.config.hysteresis;

        let was_speaking = self.state.is_speaking;
        if was_speaking {
            if sample < threshold - band {
                self.state.is_speaking = false;
            }
        } else if sample > threshold + band {
            self.state.is_speaking = true;
        }

        if self.state.is_speaking != was_speaking {
            debug!(
                speaking = self.state.is_speaking,
                sample, threshold, "VAD speaking state changed"
            );
        }

        self.state.is_speaking
    }

    fn decision(&self, is_voice: bool, is_calibrating: bool) -> VadDecision {
        VadDecision {
            threshold: self.state.adaptive_threshold,
            is_voice,
            noise_floor: self.state.noise_floor,
            is_calibrating,
        }
    }
}
