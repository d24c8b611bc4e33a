//! Estimation-error analysis
//!
//! Compares what a learner guessed with what actually happens and grades
//! the gap. The analysis carries a pyramid explanation built for the
//! context the guess was made in.

use crate::bias::pyramid::Pyramid;
use crate::core::error::Result;
use crate::core::types::{ActionKind, Axis, CognitiveFocus};
use crate::core::validation::ensure_finite;
use crate::numerics;
use serde::{Deserialize, Serialize};

/// Denominator floor so that an actual value of zero stays well-defined
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Severe,
}

impl Severity {
    /// `<10 → minor`, `<50 → moderate`, `<90 → major`, else severe
    pub fn classify(deviation_percentage: f64) -> Self {
        if deviation_percentage < 10.0 {
            Severity::Minor
        } else if deviation_percentage < 50.0 {
            Severity::Moderate
        } else if deviation_percentage < 90.0 {
            Severity::Major
        } else {
            Severity::Severe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Major => "major",
            Severity::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasDirection {
    Overestimate,
    Underestimate,
}

/// Where an estimate came from; selects the pyramid wording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateContext {
    General,
    Exponential {
        base: f64,
        power: f64,
    },
    Scenario {
        focus: CognitiveFocus,
        action: ActionKind,
        axis: Axis,
        amount: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasAnalysis {
    pub user_estimation: f64,
    pub actual_value: f64,
    pub deviation_percentage: f64,
    pub severity: Severity,
    pub bias_direction: BiasDirection,
    pub context: EstimateContext,
    pub pyramid: Pyramid,
}

/// Analyze a plain estimate against the true value
pub fn analyze(user_estimation: f64, actual_value: f64) -> Result<BiasAnalysis> {
    analyze_with_context(user_estimation, actual_value, EstimateContext::General)
}

/// Analyze a guess of `base ^ power`
pub fn analyze_exponential(user_estimation: f64, base: f64, power: f64) -> Result<BiasAnalysis> {
    let actual = numerics::exp(base, power)?;
    analyze_with_context(
        user_estimation,
        actual.value,
        EstimateContext::Exponential { base, power },
    )
}

pub fn analyze_with_context(
    user_estimation: f64,
    actual_value: f64,
    context: EstimateContext,
) -> Result<BiasAnalysis> {
    ensure_finite("user estimation", user_estimation)?;
    ensure_finite("actual value", actual_value)?;

    let deviation_percentage = ensure_finite(
        "deviation",
        (user_estimation - actual_value).abs() / actual_value.abs().max(EPSILON) * 100.0,
    )?;
    let severity = Severity::classify(deviation_percentage);
    let bias_direction = if user_estimation < actual_value {
        BiasDirection::Underestimate
    } else {
        BiasDirection::Overestimate
    };

    let pyramid = Pyramid::for_estimate(
        &context,
        user_estimation,
        actual_value,
        deviation_percentage,
        severity,
        bias_direction,
    );

    Ok(BiasAnalysis {
        user_estimation,
        actual_value,
        deviation_percentage,
        severity,
        bias_direction,
        context,
        pyramid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LabError;

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::classify(0.0), Severity::Minor);
        assert_eq!(Severity::classify(9.99), Severity::Minor);
        assert_eq!(Severity::classify(10.0), Severity::Moderate);
        assert_eq!(Severity::classify(49.9), Severity::Moderate);
        assert_eq!(Severity::classify(50.0), Severity::Major);
        assert_eq!(Severity::classify(90.0), Severity::Severe);
        assert_eq!(Severity::classify(10_000.0), Severity::Severe);
    }

    #[test]
    fn test_underestimate_of_power() {
        // A linear thinker guesses 2 * 10 = 20 for 2^10
        let analysis = analyze_exponential(20.0, 2.0, 10.0).unwrap();
        assert_eq!(analysis.actual_value, 1024.0);
        assert_eq!(analysis.bias_direction, BiasDirection::Underestimate);
        assert_eq!(analysis.severity, Severity::Severe);
        assert!((analysis.deviation_percentage - 98.046875).abs() < 1e-9);
        assert!(matches!(
            analysis.context,
            EstimateContext::Exponential { base, power } if base == 2.0 && power == 10.0
        ));
    }

    #[test]
    fn test_overestimate_and_exact_guess() {
        let over = analyze(120.0, 100.0).unwrap();
        assert_eq!(over.bias_direction, BiasDirection::Overestimate);
        assert_eq!(over.severity, Severity::Moderate);

        let exact = analyze(100.0, 100.0).unwrap();
        assert_eq!(exact.deviation_percentage, 0.0);
        assert_eq!(exact.severity, Severity::Minor);
        assert_eq!(exact.bias_direction, BiasDirection::Overestimate);
    }

    #[test]
    fn test_zero_actual_uses_epsilon() {
        let analysis = analyze(0.0, 0.0).unwrap();
        assert_eq!(analysis.deviation_percentage, 0.0);
        let off = analyze(1.0, 0.0).unwrap();
        assert_eq!(off.severity, Severity::Severe);
    }

    #[test]
    fn test_rejects_non_finite_estimate() {
        assert!(matches!(analyze(f64::NAN, 1.0), Err(LabError::Calculation(_))));
        assert!(matches!(
            analyze_exponential(1.0, 2.0, 900.0),
            Err(LabError::InputOutOfRange { .. })
        ));
    }

    #[test]
    fn test_pyramid_always_complete() {
        let analysis = analyze(3.0, 7.0).unwrap();
        assert!(analysis.pyramid.is_complete());
    }
}
