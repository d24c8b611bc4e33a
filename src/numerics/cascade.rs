//! Cascading-failure simulation
//!
//! Each failure triggers `cascade_multiplier` new ones per period while a
//! fraction `recovery_rate` is repaired: `f' = max(0, f * m * (1 - r))`.

use crate::core::error::Result;
use crate::core::validation::{ensure_count, ensure_finite, ensure_non_negative, ensure_range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Failures at the start of each period, `periods + 1` entries
    pub failures_over_time: Vec<f64>,
    pub final_failures: f64,
    pub peak_failures: f64,
    pub total_failures: f64,
}

pub fn cascading_failure(
    initial: f64,
    cascade_multiplier: f64,
    periods: u32,
    recovery_rate: f64,
) -> Result<CascadeResult> {
    ensure_non_negative("initial", initial, 1e9)?;
    ensure_non_negative("cascade_multiplier", cascade_multiplier, 100.0)?;
    ensure_count("periods", periods, 500)?;
    ensure_range("recovery_rate", recovery_rate, 0.0, 1.0)?;

    let mut failures = initial;
    let mut series = Vec::with_capacity(periods as usize + 1);
    series.push(failures);

    for _ in 0..periods {
        failures = (failures * cascade_multiplier * (1.0 - recovery_rate)).max(0.0);
        series.push(ensure_finite("cascading failure", failures)?);
    }

    let peak_failures = series.iter().copied().fold(0.0, f64::max);
    let total_failures = ensure_finite("cascade total", series.iter().sum())?;

    Ok(CascadeResult {
        failures_over_time: series,
        final_failures: failures,
        peak_failures,
        total_failures,
    })
}
