//! Phase-dependent narrative for a turn
//!
//! Output is fully determined by the input; no randomness and no state.

use crate::bias::{advice_for, analyze_with_context, BiasAnalysis, EstimateContext};
use crate::core::error::Result;
use crate::core::types::{ActionKind, Axis, CognitiveFocus, ResourceVector};
use crate::engine::delayed::DelayedEffect;
use crate::engine::phase::{detect_pattern, Phase, PatternKind};
use crate::engine::session::TurnRecord;
use crate::scenarios::Scenario;

/// Everything the generator looks at for one turn
pub struct FeedbackInput<'a> {
    pub scenario: &'a Scenario,
    pub action: ActionKind,
    pub axis: Axis,
    pub amount: u32,
    /// State after this turn's delayed effects, right before the action
    pub state_before: &'a ResourceVector,
    pub state_after: &'a ResourceVector,
    pub expected_change: i64,
    pub actual_change: i64,
    /// Turns committed before this one
    pub history: &'a [TurnRecord],
    pub phase: Phase,
    pub applied_effects: &'a [DelayedEffect],
    pub scheduled: Option<&'a DelayedEffect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub text: String,
    /// Present at the bias-reveal phase only
    pub analysis: Option<BiasAnalysis>,
    /// Present at the insight phase only
    pub advice: Vec<String>,
}

pub fn generate(input: &FeedbackInput<'_>) -> Result<Feedback> {
    let mut text = observation(input);
    let mut analysis = None;
    let mut advice = Vec::new();

    match input.phase {
        Phase::Confusion => {}
        Phase::Pattern => {
            text.push(' ');
            text.push_str(&pattern_note(input));
        }
        Phase::BiasReveal => {
            let result = analyze_with_context(
                input.expected_change as f64,
                input.actual_change as f64,
                EstimateContext::Scenario {
                    focus: input.scenario.cognitive_focus,
                    action: input.action,
                    axis: input.axis,
                    amount: input.amount,
                },
            )?;
            text.push_str(&format!(
                " A straight line predicted {} {:+}; the actual change was {:+}. {}",
                input.axis.as_str(),
                input.expected_change,
                input.actual_change,
                result.pyramid.core_conclusion
            ));
            analysis = Some(result);
        }
        Phase::Insight => {
            text.push(' ');
            text.push_str(&arc_summary(input));
            text.push(' ');
            text.push_str(key_lesson(input.scenario.cognitive_focus));
            advice = advice_for(input.scenario.cognitive_focus);
        }
    }

    Ok(Feedback {
        text,
        analysis,
        advice,
    })
}

/// One-sentence takeaway for a scenario's bias
pub fn key_lesson(focus: CognitiveFocus) -> &'static str {
    match focus {
        CognitiveFocus::LinearMisestimation => {
            "More of the same stops paying in proportion once you pass the saturation point."
        }
        CognitiveFocus::TimeDelay => {
            "The biggest effects of patient actions show up turns after you take them."
        }
        CognitiveFocus::ConfirmationBias => {
            "Evidence that only confirms your view raises certainty faster than it raises returns."
        }
    }
}

/// Neutral account of what changed, with no interpretation
fn observation(input: &FeedbackInput<'_>) -> String {
    let mut text = format!(
        "Turn {}: {} x{}. {} {} -> {} ({:+}), resources {} -> {}.",
        input.history.len() + 1,
        input.action,
        input.amount,
        input.axis.as_str(),
        input.state_before.get(input.axis),
        input.state_after.get(input.axis),
        input.actual_change,
        input.state_before.resources,
        input.state_after.resources,
    );

    for effect in input.applied_effects {
        text.push_str(&format!(
            " Earlier {} from turn {} landed: {} {:+}.",
            effect.source, effect.scheduled_on_turn, effect.axis.as_str(), effect.delta
        ));
    }
    if let Some(effect) = input.scheduled {
        text.push_str(&format!(
            " Something else is still on its way for turn {}.",
            effect.apply_at_turn
        ));
    }
    text
}

fn pattern_note(input: &FeedbackInput<'_>) -> String {
    let window = (input.history.len() + 1).min(3);
    match detect_pattern(input.history, input.action, input.amount, window) {
        Some(PatternKind::Escalation) => format!(
            "You keep choosing {} and raising the amount each time.",
            input.action
        ),
        Some(PatternKind::Repetition) => format!(
            "You have chosen {} {} times in a row.",
            input.action, window
        ),
        None => "Compare the last few turns: what did each unit of effort buy?".to_string(),
    }
}

fn arc_summary(input: &FeedbackInput<'_>) -> String {
    let expected: i64 = input
        .history
        .iter()
        .map(|r| r.expected_change)
        .sum::<i64>()
        + input.expected_change;
    let actual: i64 = input
        .history
        .iter()
        .map(|r| r.actual_change)
        .sum::<i64>()
        + input.actual_change;
    let initial = input
        .history
        .first()
        .map_or(*input.state_before, |r| r.state_before);

    format!(
        "Over {} turns a straight-line plan expected {:+} in total; you got {:+}. Resources went from {} to {}.",
        input.history.len() + 1,
        expected,
        actual,
        initial.resources,
        input.state_after.resources
    )
}
