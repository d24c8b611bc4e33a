//! Exponential kernels: raw powers, population growth, doubling time

use crate::core::error::Result;
use crate::core::validation::{
    ensure_all_finite, ensure_count, ensure_finite, ensure_non_negative, ensure_range,
};
use serde::{Deserialize, Serialize};

/// Largest |exponent| accepted by [`exp`]
pub const MAX_EXPONENT: f64 = 500.0;
/// Largest |base| accepted by [`exp`]
pub const MAX_BASE: f64 = 1_000.0;
/// Integers above 2^53 are not exactly representable as f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpResult {
    pub base: f64,
    pub exponent: f64,
    pub value: f64,
    /// Present when the result is an exactly representable integer
    pub exact: Option<i64>,
}

/// `base ^ exponent` with overflow protection
pub fn exp(base: f64, exponent: f64) -> Result<ExpResult> {
    ensure_range("exponent", exponent, -MAX_EXPONENT, MAX_EXPONENT)?;
    ensure_range("base", base, -MAX_BASE, MAX_BASE)?;

    let integral_exponent = exponent.fract() == 0.0;
    let value = if integral_exponent {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    };
    let value = ensure_finite("exponential", value)?;

    let exact = if integral_exponent && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        Some(value as i64)
    } else {
        None
    };

    Ok(ExpResult {
        base,
        exponent,
        value,
        exact,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RabbitGrowth {
    /// Population at the start of each year, `years + 1` entries
    pub history: Vec<f64>,
    pub final_population: f64,
    pub total_factor: f64,
}

/// Population that multiplies by `multiplier` every year
pub fn rabbit_growth(start: f64, years: u32, multiplier: f64) -> Result<RabbitGrowth> {
    ensure_non_negative("start", start, 1e9)?;
    ensure_count("years", years, 100)?;
    ensure_non_negative("multiplier", multiplier, 100.0)?;

    // Each entry is computed from the closed form so the final value matches start * m^years
    let history: Vec<f64> = (0..=years)
        .map(|year| start * multiplier.powi(year as i32))
        .collect();
    ensure_all_finite("rabbit growth", &history)?;

    let total_factor = ensure_finite("rabbit growth factor", multiplier.powi(years as i32))?;
    let final_population = history.last().copied().unwrap_or(start);

    Ok(RabbitGrowth {
        history,
        final_population,
        total_factor,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoublingTime {
    pub rule_of_72: f64,
    pub exact_log: f64,
    pub doubled_amount: f64,
}

/// Years needed to double `principal` at `annual_rate_pct`
pub fn doubling_time(principal: f64, annual_rate_pct: f64) -> Result<DoublingTime> {
    ensure_range("principal", principal, 0.01, 1e12)?;
    ensure_range("annual_rate_pct", annual_rate_pct, 0.01, 1_000.0)?;

    let rate = annual_rate_pct / 100.0;
    let rule_of_72 = ensure_finite("rule of 72", 72.0 / annual_rate_pct)?;
    let exact_log = ensure_finite("doubling time", 2f64.ln() / (1.0 + rate).ln())?;

    Ok(DoublingTime {
        rule_of_72,
        exact_log,
        doubled_amount: principal * 2.0,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkGrowth {
    /// Users at the start of each period, `periods + 1` entries
    pub history: Vec<f64>,
    pub final_users: f64,
    /// What a constant per-period gain would predict
    pub linear_projection: f64,
}

/// Invite-driven growth that saturates at `population_cap` (logistic update)
pub fn social_network_growth(
    initial_users: f64,
    invite_rate_pct: f64,
    periods: u32,
    population_cap: f64,
) -> Result<NetworkGrowth> {
    ensure_range("population_cap", population_cap, 1.0, 1e10)?;
    ensure_range("initial_users", initial_users, 1.0, population_cap)?;
    ensure_non_negative("invite_rate_pct", invite_rate_pct, 100.0)?;
    ensure_count("periods", periods, 500)?;

    let rate = invite_rate_pct / 100.0;
    let mut history = Vec::with_capacity(periods as usize + 1);
    let mut users = initial_users;
    history.push(users);
    for _ in 0..periods {
        users = (users + rate * users * (1.0 - users / population_cap)).clamp(0.0, population_cap);
        history.push(users);
    }
    ensure_all_finite("social network growth", &history)?;

    let linear_projection =
        ensure_finite("linear projection", initial_users * (1.0 + rate * periods as f64))?;

    Ok(NetworkGrowth {
        history,
        final_users: users,
        linear_projection,
    })
}
