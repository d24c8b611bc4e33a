//! Per-action effect resolution
//!
//! Turns an action, an amount and the pre-action state into the actual next
//! state, the straight-line projection a naive player would make, and any
//! share of the effect that lands on a later turn.

use crate::core::error::Result;
use crate::core::types::{Axis, ResourceVector, Turn, GAUGE_MAX};
use crate::core::validation::ensure_finite;
use crate::scenarios::{ActionEffect, DifficultyProfile};

/// Delayed share of an action, not yet placed in a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelay {
    pub apply_at_turn: Turn,
    pub axis: Axis,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub state_after: ResourceVector,
    /// Unclamped straight-line projection of the action
    pub linear_expectation: ResourceVector,
    pub cost: i64,
    /// Change of the primary axis a straight line predicts
    pub expected_change: i64,
    /// Change of the primary axis that actually happened (after clamping)
    pub actual_change: i64,
    pub delayed: Option<PendingDelay>,
    pub bias_after: i64,
}

fn to_units(what: &str, value: f64) -> Result<i64> {
    Ok(ensure_finite(what, value)?.round() as i64)
}

/// Resolve one action against the state left after this turn's delayed effects
pub fn resolve(
    effect: &ActionEffect,
    profile: &DifficultyProfile,
    pre_action: &ResourceVector,
    bias: i64,
    amount: u32,
    turn: Turn,
) -> Result<Resolution> {
    let units = amount as f64;

    let cost = to_units("action cost", units * effect.cost_per_unit * profile.cost_multiplier)?;
    let expected_change = to_units("linear expectation", units * effect.linear_rate)?;

    let mut linear_expectation = *pre_action;
    linear_expectation.add(Axis::Resources, -cost);
    linear_expectation.add(effect.axis, expected_change);

    let raw_effect = match &effect.yield_spec {
        Some(spec) => {
            units * spec.capital_per_unit * spec.yield_pct(pre_action.knowledge, bias) / 100.0
        }
        None => effect.curve.effect(units, profile.saturation_onset),
    };
    let primary = to_units("action effect", raw_effect * profile.immediate_multiplier)?;

    let mut state_after = *pre_action;
    state_after.add(Axis::Resources, -cost);
    state_after.add(effect.axis, primary);
    state_after.clamp();

    let delayed = match effect.delay {
        Some(spec) if amount > 0 => {
            let delta = to_units("delayed effect", units * spec.rate * profile.delayed_multiplier)?
                .min(spec.cap);
            Some(PendingDelay {
                apply_at_turn: turn + spec.turns + profile.delay_shift,
                axis: spec.axis,
                delta,
            })
        }
        _ => None,
    };

    let bias_after =
        (bias + to_units("bias change", units * effect.bias_per_unit)?).clamp(0, GAUGE_MAX);

    Ok(Resolution {
        state_after,
        linear_expectation,
        cost,
        expected_change,
        actual_change: state_after.get(effect.axis) - pre_action.get(effect.axis),
        delayed,
        bias_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ActionKind, Difficulty};
    use crate::scenarios::ScenarioCatalog;

    fn setup(scenario: &str, action: ActionKind, difficulty: Difficulty) -> (ActionEffect, DifficultyProfile, ResourceVector) {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let scenario = catalog.get(scenario).unwrap();
        (
            scenario.action(action).unwrap().clone(),
            *scenario.profile(difficulty).unwrap(),
            scenario.initial_state,
        )
    }

    #[test]
    fn test_hire_eight_past_the_knee() {
        let (effect, profile, state) = setup("coffee-shop", ActionKind::HireStaff, Difficulty::Beginner);
        let r = resolve(&effect, &profile, &state, 0, 8, 1).unwrap();
        assert_eq!(r.cost, 1600);
        assert_eq!(r.state_after.resources, 0);
        assert_eq!(r.state_after.satisfaction, 66);
        assert_eq!(r.linear_expectation.satisfaction, 114);
        assert_eq!(r.linear_expectation.resources, -600);
        assert_eq!(r.actual_change, 16);
        assert_eq!(r.expected_change, 64);
        assert!(r.delayed.is_none());
    }

    #[test]
    fn test_zero_amount_is_noop() {
        let (effect, profile, state) = setup("coffee-shop", ActionKind::Marketing, Difficulty::Advanced);
        let r = resolve(&effect, &profile, &state, 0, 0, 3).unwrap();
        assert_eq!(r.state_after, state);
        assert_eq!(r.linear_expectation, state);
        assert_eq!(r.cost, 0);
    }

    #[test]
    fn test_communication_schedules_delayed_share() {
        let (effect, profile, state) =
            setup("relationship", ActionKind::Communication, Difficulty::Intermediate);
        let r = resolve(&effect, &profile, &state, 0, 5, 1).unwrap();
        assert_eq!(r.state_after.satisfaction, 60);
        let delayed = r.delayed.unwrap();
        assert_eq!(delayed.apply_at_turn, 3);
        assert_eq!(delayed.axis, Axis::Satisfaction);
        // 5 * 3 * 1.25 = 18.75
        assert_eq!(delayed.delta, 19);
    }

    #[test]
    fn test_advanced_gift_waits_four_turns() {
        let (effect, profile, state) = setup("relationship", ActionKind::Gift, Difficulty::Advanced);
        let r = resolve(&effect, &profile, &state, 0, 10, 2).unwrap();
        let delayed = r.delayed.unwrap();
        assert_eq!(delayed.apply_at_turn, 6);
        assert_eq!(delayed.delta, 30);
        assert_eq!(r.actual_change, 8);
    }

    #[test]
    fn test_research_raises_bias_and_diversify_depends_on_knowledge() {
        let (research, profile, state) =
            setup("investment", ActionKind::Research, Difficulty::Intermediate);
        let r = resolve(&research, &profile, &state, 0, 5, 1).unwrap();
        // 4 * 5 + 1 * 2 past the knee
        assert_eq!(r.state_after.knowledge, 32);
        assert_eq!(r.bias_after, 20);
        assert_eq!(r.state_after.resources, 9500);

        let (diversify, profile, _) =
            setup("investment", ActionKind::Diversify, Difficulty::Intermediate);
        let novice = resolve(&diversify, &profile, &state, 0, 10, 2).unwrap();
        let informed = resolve(&diversify, &profile, &r.state_after, 0, 10, 2).unwrap();
        let biased = resolve(&diversify, &profile, &r.state_after, 80, 10, 2).unwrap();
        // knowledge 10 -> 6%, knowledge 32 -> 8.2% of 1000 committed
        assert_eq!(novice.actual_change, 60);
        assert_eq!(informed.actual_change, 82);
        assert!(biased.actual_change < informed.actual_change);
        assert_eq!(novice.expected_change, 100);
        assert_eq!(biased.bias_after, 60);
    }
}
