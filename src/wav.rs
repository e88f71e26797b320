use std::io::{Read, Seek};

use hound::{SampleFormat, WavReader, WavSpec};

use crate::{Error, Result};

/// Load WAV audio from a reader and return mono samples normalized to `[-1.0, 1.0]`.
///
/// What we accept:
/// - integer PCM (8 to 32 bits) or 32-bit float
/// - any sample rate (the level meter windows by duration, so no resampling is needed)
/// - any channel count; multi-channel audio is downmixed by averaging each frame
///
/// The returned `WavSpec` is the file's original spec.
pub fn read_mono_wav<R>(reader: R) -> Result<(Vec<f32>, WavSpec)>
where
    R: Read + Seek,
{
    let mut reader = WavReader::new(reader)?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(Error::msg("WAV header declares zero channels"));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(Error::msg(format!(
                    "unsupported float WAV bit depth: {}",
                    spec.bits_per_sample
                )));
            }
            reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?
        }
        SampleFormat::Int => {
            if !(8..=32).contains(&spec.bits_per_sample) {
                return Err(Error::msg(format!(
                    "unsupported integer WAV bit depth: {}",
                    spec.bits_per_sample
                )));
            }
            // Full scale for a signed sample of this width.
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    Ok((downmix_to_mono(&interleaved, spec.channels), spec))
}

fn downmix_to_mono(interleaved: &[f32], channels: u16) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}
