use std::io::BufRead;
use std::time::{Duration, Instant};

use super::{AdaptiveVad, VadDecision};
use crate::{Error, Result};

/// Replay a text log of volume levels (one number per line) through `vad`.
///
/// Blank lines and lines starting with `#` are skipped. Levels are stamped on a synthetic
/// clock advancing `frame_ms` per level, so calibration depends on the data rather than on
/// how fast the input is read. Calibration restarts when the replay begins.
pub fn replay_levels<R, F>(
    vad: &mut AdaptiveVad,
    reader: R,
    frame_ms: u32,
    mut emit: F,
) -> Result<()>
where
    R: BufRead,
    F: FnMut(&VadDecision) -> Result<()>,
{
    let origin = Instant::now();
    let step = Duration::from_millis(u64::from(frame_ms));
    vad.start_calibration_at(origin);

    let mut frame: u32 = 0;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let level: f32 = trimmed.parse().map_err(|_| {
            Error::msg(format!("line {}: '{trimmed}' is not a number", lineno + 1))
        })?;

        frame += 1;
        let decision = vad.process_volume_at(level, origin + step * frame);
        emit(&decision)?;
    }

    Ok(())
}
