//! Input-range validation shared by the numeric kernels and the engine
//!
//! Validation always runs before computation. The finiteness guard is applied
//! to results afterwards and turns NaN/infinity into a calculation error.

use crate::core::error::{LabError, Result};

/// Require `min <= value <= max`; NaN is always rejected
pub fn ensure_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value.is_nan() || value < min || value > max {
        return Err(LabError::InputOutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Require `value` to lie in `[0, max]`
pub fn ensure_non_negative(name: &'static str, value: f64, max: f64) -> Result<f64> {
    ensure_range(name, value, 0.0, max)
}

/// Integer flavour of [`ensure_range`] for counts such as years or periods
pub fn ensure_count(name: &'static str, value: u32, max: u32) -> Result<u32> {
    if value > max {
        return Err(LabError::InputOutOfRange {
            name,
            value: value as f64,
            min: 0.0,
            max: max as f64,
        });
    }
    Ok(value)
}

/// Post-computation guard: NaN and ±∞ become `Calculation` errors
pub fn ensure_finite(what: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LabError::overflow(what))
    }
}

/// Apply [`ensure_finite`] to every element of a series
pub fn ensure_all_finite(what: &str, values: &[f64]) -> Result<()> {
    for value in values {
        ensure_finite(what, *value)?;
    }
    Ok(())
}

/// Turn a raw client amount into a non-negative integer no larger than `max`
///
/// Negative, NaN, fractional and too-large values are `InvalidAmount`.
pub fn parse_amount(raw: f64, max: u32) -> Result<u32> {
    if !raw.is_finite() {
        return Err(LabError::InvalidAmount(format!("{} is not a number", raw)));
    }
    if raw < 0.0 {
        return Err(LabError::InvalidAmount(format!("{} is negative", raw)));
    }
    if raw.fract() != 0.0 {
        return Err(LabError::InvalidAmount(format!("{} is not a whole number", raw)));
    }
    if raw > max as f64 {
        return Err(LabError::InvalidAmount(format!(
            "{} exceeds the maximum of {}",
            raw, max
        )));
    }
    Ok(raw as u32)
}
