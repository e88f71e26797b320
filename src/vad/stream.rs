use std::time::{Duration, Instant};

use serde::Serialize;

use super::stats::rms;
use super::{AdaptiveVad, VadDecision};
use crate::{Error, Result};

/// Default analysis window (ms) for [`LevelStream`].
pub const DEFAULT_FRAME_MS: u32 = 50;

/// One metered analysis window and the detector's verdict on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelFrame {
    /// Offset of the window start from the beginning of the stream.
    pub start_seconds: f32,

    /// RMS level of the window.
    pub level: f32,

    #[serde(flatten)]
    pub decision: VadDecision,
}

/// Streaming RMS meter in front of an [`AdaptiveVad`].
///
/// This buffers mono PCM into fixed analysis windows, computes one RMS level per window and
/// feeds it to the detector. Time is derived from the sample count rather than the wall clock,
/// so offline audio calibrates exactly as if it had been captured live.
pub struct LevelStream {
    vad: AdaptiveVad,
    window_frames: usize,
    frame_duration: Duration,
    origin: Instant,
    windows_emitted: u32,
    in_buf: Vec<f32>,
}

impl LevelStream {
    /// Wrap `vad` and start its calibration at the beginning of the stream.
    pub fn new(mut vad: AdaptiveVad, sample_rate_hz: u32, frame_ms: u32) -> Result<Self> {
        if sample_rate_hz == 0 {
            return Err(Error::msg("sample rate must be positive"));
        }

        let window_frames = ms_to_samples(frame_ms, sample_rate_hz as f32);
        if window_frames == 0 {
            return Err(Error::msg(format!(
                "a {frame_ms}ms window at {sample_rate_hz} Hz holds no samples"
            )));
        }

        let origin = Instant::now();
        vad.start_calibration_at(origin);

        Ok(Self {
            vad,
            window_frames,
            frame_duration: Duration::from_millis(u64::from(frame_ms)),
            origin,
            windows_emitted: 0,
            in_buf: Vec::new(),
        })
    }

    pub fn vad(&self) -> &AdaptiveVad {
        &self.vad
    }

    /// Append samples and return a frame for every window that filled up.
    pub fn push(&mut self, chunk: &[f32]) -> Vec<LevelFrame> {
        self.in_buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while self.in_buf.len() >= self.window_frames {
            let window: Vec<f32> = self.in_buf.drain(..self.window_frames).collect();
            frames.push(self.process_window(&window));
        }
        frames
    }

    /// Meter whatever partial window is left over.
    pub fn flush(&mut self) -> Option<LevelFrame> {
        if self.in_buf.is_empty() {
            return None;
        }

        let window = std::mem::take(&mut self.in_buf);
        Some(self.process_window(&window))
    }

    fn process_window(&mut self, window: &[f32]) -> LevelFrame {
        let start = self.frame_duration * self.windows_emitted;
        self.windows_emitted += 1;

        // The level is only known once the window has been fully captured.
        let observed_at = self.origin + start + self.frame_duration;

        let level = rms(window);
        let decision = self.vad.process_volume_at(level, observed_at);

        LevelFrame {
            start_seconds: start.as_secs_f32(),
            level,
            decision,
        }
    }
}

fn ms_to_samples(ms: u32, sample_rate: f32) -> usize {
    ((ms as f32 / 1000.0) * sample_rate).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vad::{AdaptiveVadConfig, DEFAULT_ADAPTIVE_CONFIG};

    fn tone(amplitude: f32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect()
    }

    #[test]
    fn rejects_degenerate_windows() {
        assert!(LevelStream::new(AdaptiveVad::new(), 0, 50).is_err());
        assert!(LevelStream::new(AdaptiveVad::new(), 16_000, 0).is_err());
    }

    #[test]
    fn buffers_partial_windows() -> anyhow::Result<()> {
        let mut stream = LevelStream::new(AdaptiveVad::new(), 1_000, 50)?;

        assert!(stream.push(&tone(0.1, 30)).is_empty());
        let frames = stream.push(&tone(0.1, 30));
        assert_eq!(frames.len(), 1);
        assert!((frames[0].level - 0.1).abs() < 1e-6);
        assert_eq!(frames[0].start_seconds, 0.0);

        let tail = stream.flush().expect("10 samples were left over");
        assert!((tail.start_seconds - 0.05).abs() < 1e-6);
        assert!(stream.flush().is_none());
        Ok(())
    }

    #[test]
    fn calibrates_then_detects_speech() -> anyhow::Result<()> {
        let cfg = AdaptiveVadConfig {
            calibration_duration_ms: 500,
            ..DEFAULT_ADAPTIVE_CONFIG
        };
        let mut stream = LevelStream::new(AdaptiveVad::with_config(cfg)?, 1_000, 50)?;

        // 1s of room tone: the first ten windows calibrate, the 11th finishes it.
        let quiet = stream.push(&tone(0.02, 1_000));
        assert_eq!(quiet.len(), 20);
        assert!(quiet[..10].iter().all(|f| f.decision.is_calibrating));
        assert!(quiet.iter().all(|f| !f.decision.is_voice));
        assert!(stream.vad().state().is_calibrated);

        let loud = stream.push(&tone(0.4, 200));
        assert!(loud.iter().all(|f| f.decision.is_voice));

        let quiet_again = stream.push(&tone(0.01, 200));
        assert!(quiet_again.iter().all(|f| !f.decision.is_voice));
        Ok(())
    }
}
