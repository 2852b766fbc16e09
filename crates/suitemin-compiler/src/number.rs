//! Numeric conventions shared by the builders and the writers.

/// Round half away from zero to 6 decimals.
pub fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Objective coefficient text, fixed 6 decimals.
pub fn format_coeff(c: f64) -> String {
    format!("{c:.6}")
}

/// Integral values without a fractional part, everything else as-is.
pub fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{x}")
    }
}

/// Coefficient scaled to micro-units, as the compact dialect stores it.
/// Rounded, not truncated, so floating-point error in the scaling cannot
/// turn the `1e-6` epsilon into 0.
pub fn to_micros(c: f64) -> i64 {
    (c * 1e6).round() as i64
}
