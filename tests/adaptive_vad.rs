use std::time::{Duration, Instant};

use voxcheck::vad::INITIAL_VAD_STATE;
use voxcheck::{AdaptiveVad, AdaptiveVadConfig, AdaptiveVadConfigUpdate, DEFAULT_ADAPTIVE_CONFIG};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Calibrate on `ambient` levels spaced 50ms apart, then one more past the window.
fn calibrate(vad: &mut AdaptiveVad, ambient: &[f32]) -> Instant {
    let t0 = Instant::now();
    vad.start_calibration_at(t0);
    for (i, level) in ambient.iter().enumerate() {
        let d = vad.process_volume_at(*level, t0 + ms(50 * i as u64));
        assert!(d.is_calibrating, "sample {i} should still be calibrating");
        assert!(!d.is_voice);
    }
    t0 + vad.config().calibration_duration() + ms(1)
}

#[test]
fn session_lifecycle_detects_an_utterance() {
    let mut vad = AdaptiveVad::new();
    let room = [0.02, 0.03, 0.025, 0.02, 0.2, 0.03, 0.02];
    let after = calibrate(&mut vad, &room);

    // Finishing sample: still no detection, but calibration is done.
    let d = vad.process_volume_at(0.02, after);
    assert!(!d.is_calibrating);
    assert!(!d.is_voice);
    assert!(vad.state().is_calibrated);

    let mut t = after;
    let mut tick = |vad: &mut AdaptiveVad, level: f32| {
        t += ms(50);
        vad.process_volume_at(level, t).is_voice
    };

    let speech: Vec<bool> = [0.3, 0.35, 0.28, 0.32].iter().map(|l| tick(&mut vad, *l)).collect();
    assert!(speech.iter().all(|v| *v), "speech frames: {speech:?}");

    let silence: Vec<bool> = [0.02; 5].iter().map(|l| tick(&mut vad, *l)).collect();
    assert!(silence.iter().all(|v| !*v), "silence frames: {silence:?}");
}

#[test]
fn calibration_median_ignores_a_loud_transient() {
    let mut vad = AdaptiveVad::new();
    let t0 = Instant::now();
    vad.start_calibration_at(t0);
    for level in [0.02, 0.03, 0.05, 0.20, 0.30] {
        vad.process_volume_at(level, t0);
    }
    assert!(!vad.state().is_calibrated);

    vad.finish_calibration();
    assert_eq!(vad.state().noise_floor, 0.05);
}

#[test]
fn restarting_calibration_relearns_the_room() {
    let mut vad = AdaptiveVad::new();
    let after = calibrate(&mut vad, &[0.02, 0.02, 0.02]);
    vad.process_volume_at(0.02, after);
    assert_eq!(vad.state().noise_floor, 0.02);

    // Noisier room: restart and calibrate again.
    let t1 = after + ms(10_000);
    vad.start_calibration_at(t1);
    assert!(!vad.state().is_calibrated);
    for level in [0.08, 0.09, 0.08] {
        assert!(vad.process_volume_at(level, t1).is_calibrating);
    }
    vad.process_volume_at(0.08, t1 + ms(2_001));
    assert_eq!(vad.state().noise_floor, 0.08);
    assert!((vad.state().adaptive_threshold - 0.2).abs() < 1e-5);
}

#[test]
fn state_is_a_snapshot() {
    let mut vad = AdaptiveVad::new();
    let before = vad.state();
    vad.set_noise_floor(0.3);

    assert_eq!(before, INITIAL_VAD_STATE);
    assert_ne!(vad.state(), before);
}

#[test]
fn reset_twice_matches_reset_once() {
    let mut once = AdaptiveVad::new();
    let mut twice = AdaptiveVad::new();
    for vad in [&mut once, &mut twice] {
        let after = calibrate(vad, &[0.04, 0.05]);
        for i in 0..40 {
            vad.process_volume_at(if i % 3 == 0 { 0.5 } else { 0.04 }, after);
        }
    }

    once.reset();
    twice.reset();
    twice.reset();

    assert_eq!(once.state(), twice.state());
    assert_eq!(once.state(), INITIAL_VAD_STATE);
    assert_eq!(*once.config(), *twice.config());
}

#[test]
fn config_update_survives_reset() -> anyhow::Result<()> {
    let mut vad = AdaptiveVad::with_config(AdaptiveVadConfig {
        hysteresis: 0.02,
        ..DEFAULT_ADAPTIVE_CONFIG
    })?;
    vad.update_config(&AdaptiveVadConfigUpdate {
        snr_factor: Some(4.0),
        ..Default::default()
    })?;
    vad.reset();

    assert_eq!(vad.config().snr_factor, 4.0);
    assert_eq!(vad.config().hysteresis, 0.02);
    Ok(())
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let res = AdaptiveVad::with_config(AdaptiveVadConfig {
        snr_factor: 0.0,
        ..DEFAULT_ADAPTIVE_CONFIG
    });
    assert!(matches!(res, Err(voxcheck::Error::InvalidConfig(_))));
}
