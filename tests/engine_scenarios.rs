//! End-to-end scenario runs through the session store

use bias_lab::bias::Severity;
use bias_lab::core::error::LabError;
use bias_lab::core::types::{ActionKind, Axis, ResourceVector};
use bias_lab::engine::{Phase, SessionStore, StoreConfig};
use bias_lab::scenarios::ScenarioCatalog;
use std::sync::Arc;

fn store() -> SessionStore {
    SessionStore::new(
        Arc::new(ScenarioCatalog::builtin().unwrap()),
        StoreConfig::default(),
    )
}

#[test]
fn test_coffee_shop_hire_saturation() {
    let store = store();
    let view = store.create_session("coffee-shop", "beginner").unwrap();
    assert_eq!(view.state.resources, 1000);
    assert_eq!(view.state.satisfaction, 50);

    let outcome = store.play_turn(view.session_id, "hire_staff", 8.0).unwrap();
    assert_eq!(outcome.new_state.resources, 0);
    assert_eq!(outcome.new_state.satisfaction, 66);
    assert_eq!(outcome.phase, Phase::Confusion);
    assert!(outcome.pyramid.is_none());
    // The straight-line guess is recorded unclamped
    assert_eq!(outcome.linear_expectation.satisfaction, 114);
    assert_eq!(outcome.linear_expectation.resources, -600);
}

#[test]
fn test_regime_boundary_four_is_worse_than_three() {
    let store = store();
    let three = store.create_session("coffee-shop", "beginner").unwrap();
    let four = store.create_session("coffee-shop", "beginner").unwrap();
    let a = store.play_turn(three.session_id, "hire_staff", 3.0).unwrap();
    let b = store.play_turn(four.session_id, "hire_staff", 4.0).unwrap();
    assert_eq!(a.new_state.satisfaction, 74);
    assert_eq!(b.new_state.satisfaction, 70);
}

#[test]
fn test_relationship_delay_lands_before_turn_three() {
    let store = store();
    let id = store.create_session("relationship", "intermediate").unwrap().session_id;

    let first = store.play_turn(id, "communication", 5.0).unwrap();
    assert_eq!(first.new_state.satisfaction, 60);
    let scheduled = first.scheduled_effect.clone().unwrap();
    assert_eq!(scheduled.apply_at_turn, 3);
    assert_eq!(scheduled.axis, Axis::Satisfaction);
    assert!(scheduled.delta > 0 && scheduled.delta <= 20);

    let second = store.play_turn(id, "gift", 1.0).unwrap();
    assert!(second.applied_effects.is_empty());
    assert_eq!(second.new_state.satisfaction, 61);

    let third = store.play_turn(id, "communication", 0.0).unwrap();
    assert_eq!(third.applied_effects.len(), 1);
    assert_eq!(third.applied_effects[0].source, ActionKind::Communication);
    assert_eq!(third.new_state.satisfaction, 61 + scheduled.delta);

    let view = store.get_state(id).unwrap();
    let record = &view.history[2];
    assert_eq!(record.state_before.satisfaction, 61);
    assert_eq!(record.state_after.satisfaction, 61 + scheduled.delta);
    assert!(view.pending_effects.iter().all(|e| e.apply_at_turn > 3));
}

#[test]
fn test_bias_reveal_on_escalation() {
    let store = store();
    let id = store.create_session("coffee-shop", "beginner").unwrap().session_id;

    let first = store.play_turn(id, "hire_staff", 2.0).unwrap();
    let second = store.play_turn(id, "hire_staff", 4.0).unwrap();
    let third = store.play_turn(id, "hire_staff", 7.0).unwrap();

    assert_eq!(first.phase, Phase::Confusion);
    assert_eq!(second.phase, Phase::Pattern);
    assert_eq!(third.phase, Phase::BiasReveal);

    let pyramid = third.pyramid.expect("reveal carries a pyramid");
    assert!(pyramid.is_complete());
    assert!(!pyramid.summary.is_empty());
    assert_eq!(third.severity, Some(Severity::Severe));
    assert_eq!(third.new_state.satisfaction, 100);
}

#[test]
fn test_full_run_ends_in_insight() {
    let store = store();
    let id = store.create_session("coffee-shop", "advanced").unwrap().session_id;

    let mut last = None;
    for turn in 1..=8 {
        let outcome = store.play_turn(id, "marketing", (turn * 50) as f64).unwrap();
        assert_eq!(outcome.terminal, turn == 8);
        last = Some(outcome);
    }
    let last = last.unwrap();
    assert_eq!(last.phase, Phase::Insight);
    assert!(!last.advice.is_empty());

    assert!(matches!(
        store.play_turn(id, "marketing", 10.0),
        Err(LabError::SessionTerminal(_))
    ));

    let summary = store.end_session(id).unwrap();
    assert_eq!(summary.turns_played, 8);
    assert_eq!(summary.phases.len(), 8);
    assert!(summary.total_expected_change > summary.total_actual_change);
}

#[test]
fn test_investment_bias_gauge() {
    let store = store();
    let id = store.create_session("investment", "intermediate").unwrap().session_id;

    let research = store.play_turn(id, "research", 10.0).unwrap();
    assert_eq!(research.confirmation_bias, 40);
    assert!(research.new_state.knowledge > 10);

    let diversify = store.play_turn(id, "diversify", 10.0).unwrap();
    assert_eq!(diversify.confirmation_bias, 20);
    assert!(diversify.new_state.resources > research.new_state.resources);
}

#[test]
fn test_identical_sessions_are_distinct() {
    let store = store();
    let a = store.create_session("relationship", "beginner").unwrap();
    let b = store.create_session("relationship", "beginner").unwrap();
    assert_ne!(a.session_id, b.session_id);
    assert_eq!(a.state, b.state);
    assert_eq!(a.state, ResourceVector::new(500, 50, 50, 0));
}

#[test]
fn test_get_state_has_no_side_effects() {
    let store = store();
    let id = store.create_session("coffee-shop", "intermediate").unwrap().session_id;
    store.play_turn(id, "marketing", 300.0).unwrap();
    let first = store.get_state(id).unwrap();
    let second = store.get_state(id).unwrap();
    assert_eq!(first, second);
}
