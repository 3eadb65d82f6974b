//! Clamping of computed math-function results.
//! Spec: <https://www.w3.org/TR/css-values-4/#calc-ieee>
//!
//! Infinities clamp to the largest representable value and NaN becomes 0 so that
//! neither ever reaches layout or paint.

/// Clamp a double result: NaN → 0, ±∞ → ±`f64::MAX`.
pub fn clamp_double(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(f64::MIN, f64::MAX)
}

/// Clamp a length into the `f32` range used by layout: NaN → 0, ±∞ → ±`f32::MAX`.
pub fn clamp_length(value: f64) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32
}

/// Same as [`clamp_length`] for a value that is already single precision.
pub fn clamp_length_f32(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(f32::MIN, f32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Non-finite values never escape the clamp.
    fn non_finite_values_are_clamped() {
        assert_eq!(clamp_double(f64::NAN), 0.0);
        assert_eq!(clamp_double(f64::INFINITY), f64::MAX);
        assert_eq!(clamp_double(f64::NEG_INFINITY), f64::MIN);
        assert_eq!(clamp_length(f64::INFINITY), f32::MAX);
        assert_eq!(clamp_length(-1e300), f32::MIN);
        assert_eq!(clamp_length_f32(f32::NAN), 0.0);
        assert_eq!(clamp_length(12.5), 12.5);
    }
}
