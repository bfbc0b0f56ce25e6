//! Fixed-point temperature helpers.
//!
//! Internals keep temperature in **centi-degrees Celsius** (1 cC = 0.01 °C)
//! using `i32`, so threshold comparisons are exact — `0.1 °C` is the integer
//! 10, not a float that may or may not round across the boundary.

/// Quantize a Celsius reading to integer centi-degrees, rounding to nearest
/// and clamping to the i32 range. Non-finite values (NaN/±Inf) map to 0.
#[inline]
pub fn celsius_to_cc(t_c: f32) -> i32 {
    if !t_c.is_finite() {
        return 0;
    }
    let scaled = (t_c * 100.0).round();
    if scaled >= i32::MAX as f32 {
        i32::MAX
    } else if scaled <= i32::MIN as f32 {
        i32::MIN
    } else {
        scaled as i32
    }
}

/// Convert centi-degrees back to Celsius for the host boundary.
#[inline]
pub fn cc_to_celsius(cc: i32) -> f32 {
    (cc as f32) / 100.0
}

/// Absolute difference of two i32 values as u32 without overflow.
///
/// Uses 64-bit intermediates; for any `i32` inputs the magnitude fits in
/// `u32` (the maximum occurs for `(i32::MIN, i32::MAX)`), so the final cast
/// is lossless.
#[inline]
pub fn abs_diff_i32_u32(a: i32, b: i32) -> u32 {
    let diff = (a as i64) - (b as i64);
    let mag = if diff >= 0 {
        diff as u64
    } else {
        (-diff) as u64
    };
    debug_assert!(
        mag <= u32::MAX as u64,
        "abs_diff_i32_u32: magnitude out of u32 range: {mag}"
    );
    mag as u32
}
