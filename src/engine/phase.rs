//! Pedagogical phase derived from the decision history
//!
//! confusion → pattern → bias-reveal → insight. The classifier is a pure
//! function of the turns already played plus the decision being made now.

use crate::core::types::ActionKind;
use crate::engine::session::TurnRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Confusion,
    Pattern,
    BiasReveal,
    Insight,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Confusion => "confusion",
            Phase::Pattern => "pattern",
            Phase::BiasReveal => "bias-reveal",
            Phase::Insight => "insight",
        }
    }
}

/// Shape of the recent decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Same action every time
    Repetition,
    /// Same action with strictly increasing amounts
    Escalation,
}

/// Look for a pattern over the last `window` decisions, the current one included
pub fn detect_pattern(
    prior: &[TurnRecord],
    action: ActionKind,
    amount: u32,
    window: usize,
) -> Option<PatternKind> {
    if window < 2 || prior.len() + 1 < window {
        return None;
    }

    let mut recent: Vec<(ActionKind, u32)> = prior[prior.len() + 1 - window..]
        .iter()
        .map(|r| (r.action, r.amount))
        .collect();
    recent.push((action, amount));

    if !recent.iter().all(|(a, _)| *a == action) {
        return None;
    }
    if recent.windows(2).all(|w| w[1].1 > w[0].1) {
        Some(PatternKind::Escalation)
    } else {
        Some(PatternKind::Repetition)
    }
}

/// Phase for the turn being played
///
/// - turn 1: confusion
/// - turn 2: pattern on an escalation of the same action, else confusion
/// - turn 3: bias-reveal on repetition or escalation, else pattern
/// - turn 4+: insight once a reveal has happened, else pattern
/// - the terminal turn is always insight
pub fn classify(prior: &[TurnRecord], action: ActionKind, amount: u32, terminal: bool) -> Phase {
    if terminal {
        return Phase::Insight;
    }

    match prior.len() + 1 {
        1 => Phase::Confusion,
        2 => match detect_pattern(prior, action, amount, 2) {
            Some(PatternKind::Escalation) => Phase::Pattern,
            _ => Phase::Confusion,
        },
        3 => match detect_pattern(prior, action, amount, 3) {
            Some(_) => Phase::BiasReveal,
            None => Phase::Pattern,
        },
        _ => {
            if prior.iter().any(|r| r.phase == Phase::BiasReveal) {
                Phase::Insight
            } else {
                Phase::Pattern
            }
        }
    }
}
