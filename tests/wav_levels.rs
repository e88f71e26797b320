use std::fs::File;
use std::io::BufReader;

use hound::{SampleFormat, WavSpec, WavWriter};
use voxcheck::wav::read_mono_wav;
use voxcheck::{AdaptiveVad, AdaptiveVadConfig, DEFAULT_ADAPTIVE_CONFIG, LevelStream};

const RATE: u32 = 16_000;

/// Square-ish test signal: `amplitude` alternating sign every sample.
fn push_segment(w: &mut WavWriter<std::io::BufWriter<File>>, amplitude: f32, seconds: f32) {
    let frames = (RATE as f32 * seconds) as usize;
    let pcm = (amplitude * i16::MAX as f32) as i16;
    for i in 0..frames {
        let s = if i % 2 == 0 { pcm } else { -pcm };
        w.write_sample(s).expect("write sample");
    }
}

#[test]
fn meters_a_wav_and_finds_the_speech() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("utterance.wav");

    let spec = WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec)?;
    push_segment(&mut writer, 0.02, 1.5); // room tone, covers calibration
    push_segment(&mut writer, 0.4, 0.5); // speech
    push_segment(&mut writer, 0.01, 0.5); // silence
    writer.finalize()?;

    let (samples, got_spec) = read_mono_wav(BufReader::new(File::open(&path)?))?;
    assert_eq!(got_spec.sample_rate, RATE);

    let cfg = AdaptiveVadConfig {
        calibration_duration_ms: 1_000,
        ..DEFAULT_ADAPTIVE_CONFIG
    };
    let mut stream = LevelStream::new(AdaptiveVad::with_config(cfg)?, RATE, 50)?;
    let frames = stream.push(&samples);
    assert!(stream.flush().is_none());
    assert_eq!(frames.len(), 50);

    let voiced: Vec<f32> = frames
        .iter()
        .filter(|f| f.decision.is_voice)
        .map(|f| f.start_seconds)
        .collect();

    assert!(!voiced.is_empty());
    assert!(voiced.iter().all(|t| (1.5..2.0).contains(t)), "voiced at {voiced:?}");
    assert!(frames[..20].iter().all(|f| f.decision.is_calibrating));
    Ok(())
}
