//! Property tests for the numeric kernels, the bias grading and the engine bounds

use bias_lab::bias::{analyze, Severity};
use bias_lab::core::types::{Difficulty, SessionId};
use bias_lab::engine::Session;
use bias_lab::numerics::{approx_eq, compound, compound_real, exp, rabbit_growth};
use bias_lab::scenarios::ScenarioCatalog;
use proptest::prelude::*;

/// Strategy: one `(scenario, action, amount)` step drawn from the built-in catalogue
fn step_strategy() -> impl Strategy<Value = (usize, f64)> {
    (0usize..2, 0u32..=12).prop_map(|(action, amount)| (action, amount as f64))
}

proptest! {
    // 1. Compounding never loses to simple interest for positive rates
    #[test]
    fn compound_beats_linear(principal in 1.0f64..1e6, rate in 0.01f64..50.0, years in 1u32..60) {
        let c = compound(principal, rate, years).unwrap();
        prop_assert!(c.compound >= c.linear * (1.0 - 1e-12), "{c:?}");
        if years > 1 {
            prop_assert!(c.compound > c.linear);
        }
    }

    // 2. Inflation always erodes the nominal result
    #[test]
    fn real_below_nominal(
        principal in 1.0f64..1e6,
        nominal in 1.0f64..50.0,
        share in 0.05f64..0.95,
        years in 1u32..60,
    ) {
        let r = compound_real(principal, nominal, nominal * share, years).unwrap();
        prop_assert!(r.real < r.nominal, "{r:?}");
    }

    // 3. Rabbit growth matches the closed form
    #[test]
    fn rabbits_closed_form(start in 1.0f64..1000.0, years in 0u32..15, multiplier in 1.0f64..6.0) {
        let growth = rabbit_growth(start, years, multiplier).unwrap();
        prop_assert_eq!(growth.history.len(), years as usize + 1);
        prop_assert!(approx_eq(growth.final_population, start * multiplier.powi(years as i32)));
    }

    // 4. Base one is always one
    #[test]
    fn exp_of_one(n in -500i32..=500) {
        prop_assert_eq!(exp(1.0, n as f64).unwrap().value, 1.0);
    }

    // 5. Severity never decreases as the deviation grows
    #[test]
    fn severity_monotonic(actual in 1.0f64..1e4, a in 0.0f64..3.0, b in 0.0f64..3.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let near = analyze(actual * (1.0 + low), actual).unwrap();
        let far = analyze(actual * (1.0 + high), actual).unwrap();
        prop_assert!(near.severity <= far.severity);
        prop_assert!(Severity::classify(near.deviation_percentage) == near.severity);
    }

    // 6. Any accepted sequence of turns keeps the state in bounds and the history consistent
    #[test]
    fn sessions_stay_in_bounds(scenario in 0usize..3, steps in prop::collection::vec(step_strategy(), 1..12)) {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let scenario = catalog.iter().nth(scenario).unwrap();
        let difficulty = *scenario.difficulties.keys().last().unwrap();
        let mut session = Session::new(SessionId::new(), scenario, difficulty).unwrap();

        for (action, amount) in steps {
            let name = scenario.actions[action % scenario.actions.len()].kind.as_str();
            let _ = session.play_turn(scenario, name, amount);

            prop_assert!(session.state.is_within_bounds(), "{:?}", session.state);
            prop_assert!((0..=100).contains(&session.confirmation_bias));
            if !session.terminal {
                prop_assert_eq!(session.turn as usize, session.history.len() + 1);
            }
        }

        let mut previous = scenario.initial_state;
        for record in &session.history {
            prop_assert_eq!(record.state_before, previous);
            previous = record.state_after;
        }
    }
}

#[test]
fn test_every_difficulty_stays_in_bounds() {
    let catalog = ScenarioCatalog::builtin().unwrap();
    for scenario in catalog.iter() {
        for difficulty in Difficulty::ALL {
            let Ok(mut session) = Session::new(SessionId::new(), scenario, difficulty) else {
                continue;
            };
            let max = scenario.actions[0].max_amount as f64;
            while !session.terminal {
                session
                    .play_turn(scenario, scenario.actions[0].kind.as_str(), max)
                    .unwrap();
                assert!(session.state.is_within_bounds());
            }
        }
    }
}
