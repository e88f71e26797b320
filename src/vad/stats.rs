//! Small numeric helpers shared by the detector and the level meter.

/// Value at index `floor(len * p)` of an ascending slice, clamped to the last element.
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f32], p: f32) -> Option<f32> {
    if sorted.is_empty() {
        return None;
    }

    let idx = (sorted.len() as f32 * p.clamp(0.0, 1.0)).floor() as usize;
    Some(sorted[idx.min(sorted.len() - 1)])
}

/// Sort a copy of `samples` ascending and take its `p`-th percentile.
pub fn sorted_percentile(samples: impl IntoIterator<Item = f32>, p: f32) -> Option<f32> {
    let mut sorted: Vec<f32> = samples.into_iter().collect();
    sorted.sort_by(f32::total_cmp);
    percentile(&sorted, p)
}

/// Clamp a volume sample into `[0.0, 1.0]`; non-finite values map to `0.0`.
///
/// Returns the sanitized value and whether it had to be changed.
pub fn clamp_unit(sample: f32) -> (f32, bool) {
    if !sample.is_finite() {
        return (0.0, true);
    }

    let clamped = sample.clamp(0.0, 1.0);
    (clamped, clamped != sample)
}

/// Root mean square of a block of PCM samples (`0.0` for an empty block).
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}
