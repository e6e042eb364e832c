//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the u32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Convert a length or count to u32, saturating at `u32::MAX`.
#[must_use]
pub fn usize_to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Convert u32 to f64 in a single location.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// `part / whole`, or `None` when `whole` is zero.
#[must_use]
pub fn ratio(part: u32, whole: u32) -> Option<f64> {
    (whole > 0).then(|| u32_to_f64(part) / u32_to_f64(whole))
}

/// Whole-number percentage of `part` in `whole`, 0 when `whole` is zero.
#[must_use]
pub fn percentage(part: u32, whole: u32) -> u32 {
    ratio(part, whole).map_or(0, |r| round_f64_to_u32(r * 100.0))
}
