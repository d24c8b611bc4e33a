//! Pure numeric kernels for exponential and compound growth

pub mod cascade;
pub mod compound;
pub mod growth;

pub use cascade::{cascading_failure, CascadeResult};
pub use compound::{
    compound, compound_real, compound_variable_rates, compound_with_contributions,
    CompoundComparison, ContributionResult, RealReturn, VariableRateResult,
};
pub use growth::{
    doubling_time, exp, rabbit_growth, social_network_growth, DoublingTime, ExpResult,
    NetworkGrowth, RabbitGrowth,
};

/// Relative tolerance used when comparing kernel output
pub const REL_TOLERANCE: f64 = 1e-3;

/// Compare within [`REL_TOLERANCE`] of the larger magnitude (absolute for values near zero)
pub fn approx_eq(actual: f64, expected: f64) -> bool {
    let scale = actual.abs().max(expected.abs()).max(1.0);
    (actual - expected).abs() <= REL_TOLERANCE * scale
}
