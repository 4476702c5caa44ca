//! Volume clamping

/// Clamp a requested volume into `[0, 1]`
///
/// Out-of-range input is clamped, never rejected. Returns `None` for NaN,
/// which has no meaningful position on the scale.
pub fn clamp_volume(volume: f64) -> Option<f64> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}
