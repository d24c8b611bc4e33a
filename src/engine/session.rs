//! A single learner's run through a scenario

use crate::bias::{Pyramid, Severity};
use crate::core::error::{LabError, Result};
use crate::core::types::{ActionKind, Axis, Difficulty, ResourceVector, SessionId, Turn};
use crate::core::validation::parse_amount;
use crate::engine::delayed::{DelayQueue, DelayedEffect};
use crate::engine::phase::{self, Phase};
use crate::engine::rules;
use crate::feedback::{self, FeedbackInput};
use crate::scenarios::Scenario;
use serde::{Deserialize, Serialize};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One committed turn. Never changed after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: Turn,
    pub action: ActionKind,
    pub amount: u32,
    /// Primary axis of the action
    pub axis: Axis,
    /// State at the start of the turn, before delayed effects
    pub state_before: ResourceVector,
    pub state_after: ResourceVector,
    pub linear_expectation: ResourceVector,
    pub expected_change: i64,
    pub actual_change: i64,
    pub phase: Phase,
    pub feedback_text: String,
    /// Delayed effects that landed at the start of this turn
    pub applied_effects: Vec<DelayedEffect>,
    pub scheduled_effect: Option<DelayedEffect>,
}

/// Result of a successful `play_turn`
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub session_id: SessionId,
    pub turn: Turn,
    pub new_state: ResourceVector,
    pub linear_expectation: ResourceVector,
    pub phase: Phase,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pyramid: Option<Pyramid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advice: Vec<String>,
    pub applied_effects: Vec<DelayedEffect>,
    pub scheduled_effect: Option<DelayedEffect>,
    pub confirmation_bias: i64,
    pub terminal: bool,
}

/// Public, read-only view of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub scenario_id: String,
    pub difficulty: Difficulty,
    pub turn: Turn,
    pub max_turns: u32,
    pub state: ResourceVector,
    pub confirmation_bias: i64,
    pub history: Vec<TurnRecord>,
    pub pending_effects: Vec<DelayedEffect>,
    pub terminal: bool,
    pub created_at: u64,
    pub last_touched_at: u64,
}

/// End-of-session report; computed once and then cached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub scenario_id: String,
    pub difficulty: Difficulty,
    pub turns_played: u32,
    pub initial_state: ResourceVector,
    pub final_state: ResourceVector,
    pub phases: Vec<Phase>,
    pub total_expected_change: i64,
    pub total_actual_change: i64,
    /// Delayed effects that never landed because the session ended first
    pub unrealized_effects: Vec<DelayedEffect>,
    pub confirmation_bias: i64,
    pub key_lesson: String,
    pub advice: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub scenario_id: String,
    pub difficulty: Difficulty,
    /// Turn about to be played (1-based)
    pub turn: Turn,
    pub max_turns: u32,
    pub initial_state: ResourceVector,
    pub state: ResourceVector,
    /// Hidden confirmation-bias gauge, 0..=100
    pub confirmation_bias: i64,
    pub history: Vec<TurnRecord>,
    pub delayed_effects: DelayQueue,
    pub created_at: u64,
    pub last_touched_at: u64,
    pub terminal: bool,
    pub summary: Option<SessionSummary>,
    #[serde(skip, default = "Instant::now")]
    last_touched: Instant,
}

impl Session {
    /// Start a fresh session; fails if the scenario does not offer `difficulty`
    pub fn new(id: SessionId, scenario: &Scenario, difficulty: Difficulty) -> Result<Self> {
        scenario.profile(difficulty)?;
        let now = unix_now();
        Ok(Self {
            id,
            scenario_id: scenario.id.clone(),
            difficulty,
            turn: 1,
            max_turns: scenario.max_turns,
            initial_state: scenario.initial_state,
            state: scenario.initial_state,
            confirmation_bias: 0,
            history: Vec::new(),
            delayed_effects: DelayQueue::new(),
            created_at: now,
            last_touched_at: now,
            terminal: false,
            summary: None,
            last_touched: Instant::now(),
        })
    }

    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
        self.last_touched_at = unix_now();
    }

    /// Monotonic time of the last mutation
    pub fn last_touched(&self) -> Instant {
        self.last_touched
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            scenario_id: self.scenario_id.clone(),
            difficulty: self.difficulty,
            turn: self.turn,
            max_turns: self.max_turns,
            state: self.state,
            confirmation_bias: self.confirmation_bias,
            history: self.history.clone(),
            pending_effects: self.delayed_effects.pending(),
            terminal: self.terminal,
            created_at: self.created_at,
            last_touched_at: self.last_touched_at,
        }
    }

    /// Play one turn. Either the whole turn commits or the session is left untouched.
    pub fn play_turn(&mut self, scenario: &Scenario, action: &str, amount: f64) -> Result<TurnOutcome> {
        if self.terminal {
            return Err(LabError::SessionTerminal(self.id.to_string()));
        }

        let effect = scenario.resolve_action(action)?;
        let amount = parse_amount(amount, effect.max_amount)?;
        let profile = scenario.profile(self.difficulty)?;

        // Work on copies until every fallible step has passed
        let mut queue = self.delayed_effects.clone();
        let state_before = self.state;
        let mut pre_action = self.state;
        let applied = queue.pop_due(self.turn);
        for delayed in &applied {
            delayed.apply(&mut pre_action);
        }

        let resolution = rules::resolve(
            effect,
            profile,
            &pre_action,
            self.confirmation_bias,
            amount,
            self.turn,
        )?;

        let terminal = self.turn >= self.max_turns;
        let phase = phase::classify(&self.history, effect.kind, amount, terminal);

        let scheduled = resolution.delayed.map(|d| {
            queue.schedule(d.apply_at_turn, self.turn, effect.kind, d.axis, d.delta)
        });

        let narrative = feedback::generate(&FeedbackInput {
            scenario,
            action: effect.kind,
            axis: effect.axis,
            amount,
            state_before: &pre_action,
            state_after: &resolution.state_after,
            expected_change: resolution.expected_change,
            actual_change: resolution.actual_change,
            history: &self.history,
            phase,
            applied_effects: &applied,
            scheduled: scheduled.as_ref(),
        })?;

        self.history.push(TurnRecord {
            turn: self.turn,
            action: effect.kind,
            amount,
            axis: effect.axis,
            state_before,
            state_after: resolution.state_after,
            linear_expectation: resolution.linear_expectation,
            expected_change: resolution.expected_change,
            actual_change: resolution.actual_change,
            phase,
            feedback_text: narrative.text.clone(),
            applied_effects: applied.clone(),
            scheduled_effect: scheduled.clone(),
        });
        let played = self.turn;
        self.turn += 1;
        self.state = resolution.state_after;
        self.confirmation_bias = resolution.bias_after;
        self.delayed_effects = queue;
        self.terminal = terminal;
        self.touch();

        let (pyramid, severity) = match narrative.analysis {
            Some(analysis) => (Some(analysis.pyramid), Some(analysis.severity)),
            None => (None, None),
        };

        Ok(TurnOutcome {
            session_id: self.id,
            turn: played,
            new_state: self.state,
            linear_expectation: resolution.linear_expectation,
            phase,
            feedback: narrative.text,
            pyramid,
            severity,
            advice: narrative.advice,
            applied_effects: applied,
            scheduled_effect: scheduled,
            confirmation_bias: self.confirmation_bias,
            terminal,
        })
    }

    /// Mark the session terminal and return its summary; repeated calls return the same summary
    pub fn end(&mut self, scenario: &Scenario) -> SessionSummary {
        if let Some(summary) = &self.summary {
            return summary.clone();
        }

        self.terminal = true;
        let summary = SessionSummary {
            session_id: self.id,
            scenario_id: self.scenario_id.clone(),
            difficulty: self.difficulty,
            turns_played: self.history.len() as u32,
            initial_state: self.initial_state,
            final_state: self.state,
            phases: self.history.iter().map(|r| r.phase).collect(),
            total_expected_change: self.history.iter().map(|r| r.expected_change).sum(),
            total_actual_change: self.history.iter().map(|r| r.actual_change).sum(),
            unrealized_effects: self.delayed_effects.pending(),
            confirmation_bias: self.confirmation_bias,
            key_lesson: feedback::key_lesson(scenario.cognitive_focus).to_string(),
            advice: crate::bias::advice_for(scenario.cognitive_focus),
        };
        self.summary = Some(summary.clone());
        self.touch();
        summary
    }
}
