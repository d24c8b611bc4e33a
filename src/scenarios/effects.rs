//! Action effect descriptors and difficulty profiles

use crate::core::types::{ActionKind, Axis};
use serde::{Deserialize, Serialize};

/// How a tiered curve turns an amount into an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveMode {
    /// The whole amount is paid at the rate of the region it falls in
    Regime,
    /// Each unit is paid at the rate of the region that unit falls in
    Marginal,
}

/// One region of a saturation curve; `up_to = None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub up_to: Option<f64>,
    pub rate: f64,
}

/// Piecewise-linear response with knees between tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationCurve {
    pub mode: CurveMode,
    pub tiers: Vec<Tier>,
}

impl SaturationCurve {
    pub fn linear(rate: f64) -> Self {
        Self {
            mode: CurveMode::Marginal,
            tiers: vec![Tier { up_to: None, rate }],
        }
    }

    /// Effect of `amount`; knees are scaled by `onset` (below 1 saturates earlier)
    pub fn effect(&self, amount: f64, onset: f64) -> f64 {
        match self.mode {
            CurveMode::Regime => {
                let rate = self
                    .tiers
                    .iter()
                    .find(|tier| tier.up_to.map_or(true, |knee| amount <= knee * onset))
                    .or_else(|| self.tiers.last())
                    .map_or(0.0, |tier| tier.rate);
                amount * rate
            }
            CurveMode::Marginal => {
                let mut total = 0.0;
                let mut lower = 0.0;
                for tier in &self.tiers {
                    let upper = tier.up_to.map_or(f64::INFINITY, |knee| knee * onset);
                    if amount > lower {
                        total += (amount.min(upper) - lower) * tier.rate;
                    }
                    if amount <= upper {
                        break;
                    }
                    lower = upper;
                }
                total
            }
        }
    }

    /// Knee positions after applying `onset`
    pub fn knees(&self, onset: f64) -> Vec<f64> {
        self.tiers
            .iter()
            .filter_map(|tier| tier.up_to.map(|knee| knee * onset))
            .collect()
    }
}

/// Part of an action that lands turns later
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelaySpec {
    /// Turns between the action and its delayed effect, before the difficulty shift
    pub turns: u32,
    pub axis: Axis,
    pub rate: f64,
    /// Upper bound on a single delayed increment
    pub cap: i64,
}

/// Knowledge-dependent return used by investment actions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldSpec {
    /// Capital committed per unit of amount
    pub capital_per_unit: f64,
    /// Yield in percent with zero knowledge
    pub base_pct: f64,
    /// Extra percent of yield per knowledge point
    pub knowledge_pct: f64,
    /// Percent of yield lost per point of confirmation bias
    pub bias_drag_pct: f64,
}

impl YieldSpec {
    /// Yield in percent for the given knowledge and bias (both 0..=100)
    pub fn yield_pct(&self, knowledge: i64, bias: i64) -> f64 {
        let raw = self.base_pct + self.knowledge_pct * knowledge as f64;
        let drag = (1.0 - self.bias_drag_pct * bias as f64 / 100.0).max(0.0);
        raw * drag
    }
}

/// Everything the engine needs to apply one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEffect {
    pub kind: ActionKind,
    pub description: String,
    /// Primary axis the action moves
    pub axis: Axis,
    pub max_amount: u32,
    /// Resources spent per unit of amount
    pub cost_per_unit: f64,
    /// Per-unit effect a naive straight-line guess assumes
    pub linear_rate: f64,
    pub curve: SaturationCurve,
    pub delay: Option<DelaySpec>,
    pub yield_spec: Option<YieldSpec>,
    /// Change of the confirmation-bias gauge per unit
    pub bias_per_unit: f64,
}

/// Multiplier set applied to every action of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub immediate_multiplier: f64,
    pub delayed_multiplier: f64,
    pub cost_multiplier: f64,
    /// Extra turns added to every delay
    pub delay_shift: u32,
    /// Scale on every knee; below 1 means saturation sets in earlier
    pub saturation_onset: f64,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self {
            immediate_multiplier: 1.0,
            delayed_multiplier: 1.0,
            cost_multiplier: 1.0,
            delay_shift: 0,
            saturation_onset: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hire_curve() -> SaturationCurve {
        SaturationCurve {
            mode: CurveMode::Regime,
            tiers: vec![
                Tier { up_to: Some(3.0), rate: 8.0 },
                Tier { up_to: Some(6.0), rate: 5.0 },
                Tier { up_to: None, rate: 2.0 },
            ],
        }
    }

    #[test]
    fn test_regime_curve_knees() {
        let curve = hire_curve();
        assert_eq!(curve.effect(3.0, 1.0), 24.0);
        assert_eq!(curve.effect(4.0, 1.0), 20.0);
        assert_eq!(curve.effect(6.0, 1.0), 30.0);
        assert_eq!(curve.effect(8.0, 1.0), 16.0);
        assert_eq!(curve.effect(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_earlier_onset_saturates_sooner() {
        let curve = hire_curve();
        // Knees move to 2.25 and 4.5
        assert_eq!(curve.effect(3.0, 0.75), 15.0);
        assert_eq!(curve.knees(0.75), vec![2.25, 4.5]);
    }

    #[test]
    fn test_marginal_curve() {
        let curve = SaturationCurve {
            mode: CurveMode::Marginal,
            tiers: vec![
                Tier { up_to: Some(200.0), rate: 0.1 },
                Tier { up_to: Some(500.0), rate: 0.04 },
                Tier { up_to: None, rate: 0.01 },
            ],
        };
        assert!((curve.effect(100.0, 1.0) - 10.0).abs() < 1e-9);
        assert!((curve.effect(200.0, 1.0) - 20.0).abs() < 1e-9);
        assert!((curve.effect(500.0, 1.0) - 32.0).abs() < 1e-9);
        assert!((curve.effect(1000.0, 1.0) - 37.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_curve() {
        assert_eq!(SaturationCurve::linear(2.0).effect(5.0, 0.5), 10.0);
    }

    #[test]
    fn test_yield_depends_on_knowledge_and_bias() {
        let spec = YieldSpec {
            capital_per_unit: 100.0,
            base_pct: 5.0,
            knowledge_pct: 0.1,
            bias_drag_pct: 0.5,
        };
        assert!((spec.yield_pct(0, 0) - 5.0).abs() < 1e-9);
        assert!((spec.yield_pct(100, 0) - 15.0).abs() < 1e-9);
        assert!((spec.yield_pct(100, 100) - 7.5).abs() < 1e-9);
    }
}
