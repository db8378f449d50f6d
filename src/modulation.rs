//! Scalar range remapping and spectrum reducers.
//!
//! Everything in the mapping layer is expressed with these four primitives.
//! The remaps are unclamped: a loud frame may push a value past the nominal
//! output range.

/// Position of `value` inside `[min, max]` as a fraction (0 at `min`, 1 at `max`)
///
/// `min` and `max` must differ.
pub fn fractionate(value: f32, min: f32, max: f32) -> f32 {
    debug_assert!(min != max, "fractionate over empty range [{min}, {max}]");
    (value - min) / (max - min)
}

/// Affine remap of `value` from `[in_min, in_max]` onto `[out_min, out_max]`
///
/// Inputs outside the source range extrapolate past the target range.
/// Reversed output ranges (`out_min > out_max`) invert the mapping.
pub fn modulate(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let fr = fractionate(value, in_min, in_max);
    let delta = out_max - out_min;
    out_min + fr * delta
}

/// Arithmetic mean of byte magnitudes, `None` for an empty slice
pub fn average(values: &[u8]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let total: u64 = values.iter().map(|&v| u64::from(v)).sum();
    Some(total as f32 / values.len() as f32)
}

/// Largest byte magnitude, `None` for an empty slice
pub fn peak(values: &[u8]) -> Option<u8> {
    values.iter().copied().max()
}
