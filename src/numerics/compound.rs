//! Compound interest kernels
//!
//! Rates are given in percent (8.0 means 8%). Every kernel validates its
//! inputs first and screens its outputs for NaN/infinity.

use crate::core::error::Result;
use crate::core::validation::{ensure_count, ensure_finite, ensure_non_negative, ensure_range};
use crate::core::LabError;
use serde::{Deserialize, Serialize};

const MAX_PRINCIPAL: f64 = 1e12;
const MAX_RATE_PCT: f64 = 1_000.0;
const MAX_YEARS: u32 = 200;
const MAX_PERIODS: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundComparison {
    /// Simple interest: `principal * (1 + r * years)`
    pub linear: f64,
    /// Compound interest: `principal * (1 + r) ^ years`
    pub compound: f64,
    pub advantage: f64,
}

/// Simple versus compound growth of `principal`
pub fn compound(principal: f64, annual_rate_pct: f64, years: u32) -> Result<CompoundComparison> {
    ensure_non_negative("principal", principal, MAX_PRINCIPAL)?;
    ensure_range("annual_rate_pct", annual_rate_pct, -100.0, MAX_RATE_PCT)?;
    ensure_count("years", years, MAX_YEARS)?;

    let rate = annual_rate_pct / 100.0;
    let linear = ensure_finite("linear growth", principal * (1.0 + rate * years as f64))?;
    let compound = ensure_finite("compound growth", principal * (1.0 + rate).powi(years as i32))?;

    Ok(CompoundComparison {
        linear,
        compound,
        advantage: compound - linear,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionResult {
    pub future_value: f64,
    pub total_contributed: f64,
    pub interest_earned: f64,
}

/// Future value with a fixed contribution at the end of every month
///
/// Closed form: `P(1+i)^n + C((1+i)^n - 1)/i` with monthly rate `i` and
/// `n = 12 * years` months.
pub fn compound_with_contributions(
    initial: f64,
    monthly_contribution: f64,
    annual_rate_pct: f64,
    years: u32,
) -> Result<ContributionResult> {
    ensure_non_negative("initial", initial, MAX_PRINCIPAL)?;
    ensure_non_negative("monthly_contribution", monthly_contribution, 1e9)?;
    ensure_range("annual_rate_pct", annual_rate_pct, -100.0, MAX_RATE_PCT)?;
    ensure_count("years", years, MAX_YEARS)?;

    let months = years * 12;
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;

    let future_value = if monthly_rate == 0.0 {
        initial + monthly_contribution * months as f64
    } else {
        let growth = (1.0 + monthly_rate).powi(months as i32);
        initial * growth + monthly_contribution * (growth - 1.0) / monthly_rate
    };
    let future_value = ensure_finite("future value", future_value)?;

    let total_contributed = initial + monthly_contribution * months as f64;

    Ok(ContributionResult {
        future_value,
        total_contributed,
        interest_earned: future_value - total_contributed,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealReturn {
    pub nominal: f64,
    /// Value in today's money
    pub real: f64,
    pub real_rate_pct: f64,
}

/// Nominal versus inflation-adjusted growth
pub fn compound_real(
    principal: f64,
    nominal_rate_pct: f64,
    inflation_pct: f64,
    years: u32,
) -> Result<RealReturn> {
    ensure_non_negative("principal", principal, MAX_PRINCIPAL)?;
    ensure_range("nominal_rate_pct", nominal_rate_pct, -100.0, MAX_RATE_PCT)?;
    ensure_range("inflation_pct", inflation_pct, -99.0, MAX_RATE_PCT)?;
    ensure_count("years", years, MAX_YEARS)?;

    let nominal_rate = nominal_rate_pct / 100.0;
    let inflation = inflation_pct / 100.0;
    let real_rate = (1.0 + nominal_rate) / (1.0 + inflation) - 1.0;

    let nominal = ensure_finite("nominal value", principal * (1.0 + nominal_rate).powi(years as i32))?;
    let real = ensure_finite("real value", principal * (1.0 + real_rate).powi(years as i32))?;

    Ok(RealReturn {
        nominal,
        real,
        real_rate_pct: real_rate * 100.0,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRateResult {
    pub final_amount: f64,
    /// Balance after each period
    pub per_period: Vec<f64>,
    pub total_fees: f64,
}

/// Apply one rate per period, then deduct the fee on the new balance
pub fn compound_variable_rates(
    principal: f64,
    per_period_rates_pct: &[f64],
    fees_rate_pct: f64,
) -> Result<VariableRateResult> {
    ensure_non_negative("principal", principal, MAX_PRINCIPAL)?;
    ensure_non_negative("fees_rate_pct", fees_rate_pct, 100.0)?;
    if per_period_rates_pct.len() > MAX_PERIODS {
        return Err(LabError::InputOutOfRange {
            name: "periods",
            value: per_period_rates_pct.len() as f64,
            min: 0.0,
            max: MAX_PERIODS as f64,
        });
    }
    for rate in per_period_rates_pct {
        ensure_range("period_rate_pct", *rate, -100.0, MAX_RATE_PCT)?;
    }

    let fee = fees_rate_pct / 100.0;
    let mut amount = principal;
    let mut total_fees = 0.0;
    let mut per_period = Vec::with_capacity(per_period_rates_pct.len());

    for rate in per_period_rates_pct {
        amount *= 1.0 + rate / 100.0;
        let charged = amount * fee;
        amount -= charged;
        total_fees += charged;
        per_period.push(ensure_finite("variable-rate balance", amount)?);
    }

    Ok(VariableRateResult {
        final_amount: amount,
        per_period,
        total_fees: ensure_finite("fees", total_fees)?,
    })
}
