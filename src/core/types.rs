//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, process-unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Turn counter (1-based)
pub type Turn = u32;

/// Upper bound of the three bounded gauges
pub const GAUGE_MAX: i64 = 100;

/// The four-field state of a scenario session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceVector {
    /// Money / capacity; never negative
    pub resources: i64,
    /// 0..=100
    pub satisfaction: i64,
    /// 0..=100
    pub reputation: i64,
    /// 0..=100
    pub knowledge: i64,
}

impl Default for ResourceVector {
    fn default() -> Self {
        Self {
            resources: 1000,
            satisfaction: 50,
            reputation: 50,
            knowledge: 0,
        }
    }
}

impl ResourceVector {
    pub fn new(resources: i64, satisfaction: i64, reputation: i64, knowledge: i64) -> Self {
        Self {
            resources,
            satisfaction,
            reputation,
            knowledge,
        }
    }

    pub fn get(&self, axis: Axis) -> i64 {
        match axis {
            Axis::Resources => self.resources,
            Axis::Satisfaction => self.satisfaction,
            Axis::Reputation => self.reputation,
            Axis::Knowledge => self.knowledge,
        }
    }

    /// Add `delta` to one axis without clamping
    pub fn add(&mut self, axis: Axis, delta: i64) {
        let slot = match axis {
            Axis::Resources => &mut self.resources,
            Axis::Satisfaction => &mut self.satisfaction,
            Axis::Reputation => &mut self.reputation,
            Axis::Knowledge => &mut self.knowledge,
        };
        *slot = slot.saturating_add(delta);
    }

    /// Clamp every field into its documented bounds
    pub fn clamp(&mut self) {
        self.resources = self.resources.max(0);
        self.satisfaction = self.satisfaction.clamp(0, GAUGE_MAX);
        self.reputation = self.reputation.clamp(0, GAUGE_MAX);
        self.knowledge = self.knowledge.clamp(0, GAUGE_MAX);
    }

    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }

    pub fn is_within_bounds(&self) -> bool {
        *self == self.clamped()
    }
}

/// One component of the resource vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Resources,
    Satisfaction,
    Reputation,
    Knowledge,
}

impl Axis {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resources" => Some(Axis::Resources),
            "satisfaction" => Some(Axis::Satisfaction),
            "reputation" => Some(Axis::Reputation),
            "knowledge" => Some(Axis::Knowledge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Resources => "resources",
            Axis::Satisfaction => "satisfaction",
            Axis::Reputation => "reputation",
            Axis::Knowledge => "knowledge",
        }
    }
}

/// Difficulty profile requested at session creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// The bias a scenario is built to expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CognitiveFocus {
    LinearMisestimation,
    TimeDelay,
    ConfirmationBias,
}

impl CognitiveFocus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "linear-misestimation" => Some(CognitiveFocus::LinearMisestimation),
            "time-delay" => Some(CognitiveFocus::TimeDelay),
            "confirmation-bias" => Some(CognitiveFocus::ConfirmationBias),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CognitiveFocus::LinearMisestimation => "linear misestimation",
            CognitiveFocus::TimeDelay => "time-delay blindness",
            CognitiveFocus::ConfirmationBias => "confirmation bias",
        }
    }
}

/// Every decision a player can make across all scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    HireStaff,
    Marketing,
    Communication,
    Gift,
    Research,
    Diversify,
}

impl ActionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hire_staff" => Some(ActionKind::HireStaff),
            "marketing" => Some(ActionKind::Marketing),
            "communication" => Some(ActionKind::Communication),
            "gift" => Some(ActionKind::Gift),
            "research" => Some(ActionKind::Research),
            "diversify" => Some(ActionKind::Diversify),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::HireStaff => "hire_staff",
            ActionKind::Marketing => "marketing",
            ActionKind::Communication => "communication",
            ActionKind::Gift => "gift",
            ActionKind::Research => "research",
            ActionKind::Diversify => "diversify",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
