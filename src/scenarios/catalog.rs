//! Immutable scenario catalogue

use crate::core::error::{LabError, Result};
use crate::core::types::{ActionKind, CognitiveFocus, Difficulty, ResourceVector};
use crate::scenarios::effects::{ActionEffect, DifficultyProfile};
use crate::scenarios::loader::parse_scenarios;
use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

const BUILTIN_SCENARIOS: &str = include_str!("../../data/scenarios.toml");

/// A scenario definition as declared in the catalogue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub long_description: String,
    pub cognitive_focus: CognitiveFocus,
    pub max_turns: u32,
    pub initial_state: ResourceVector,
    pub actions: Vec<ActionEffect>,
    pub difficulties: BTreeMap<Difficulty, DifficultyProfile>,
}

impl Scenario {
    pub fn action(&self, kind: ActionKind) -> Option<&ActionEffect> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    /// Resolve an action name against this scenario's allowed actions
    pub fn resolve_action(&self, name: &str) -> Result<&ActionEffect> {
        ActionKind::parse(name)
            .and_then(|kind| self.action(kind))
            .ok_or_else(|| LabError::UnknownAction {
                scenario: self.id.clone(),
                action: name.to_string(),
            })
    }

    pub fn profile(&self, difficulty: Difficulty) -> Result<&DifficultyProfile> {
        self.difficulties
            .get(&difficulty)
            .ok_or_else(|| LabError::UnsupportedDifficulty {
                scenario: self.id.clone(),
                difficulty: difficulty.as_str().to_string(),
            })
    }

    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            cognitive_focus: self.cognitive_focus,
            max_turns: self.max_turns,
            difficulties: self.difficulties.keys().copied().collect(),
            actions: self.actions.iter().map(|a| a.kind).collect(),
        }
    }
}

/// Listing entry for `GET /scenarios`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cognitive_focus: CognitiveFocus,
    pub max_turns: u32,
    pub difficulties: Vec<Difficulty>,
    pub actions: Vec<ActionKind>,
}

/// Scenarios loaded once at startup and never mutated
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
    by_id: AHashMap<String, usize>,
}

impl ScenarioCatalog {
    /// The catalogue compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_SCENARIOS)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let scenarios = parse_scenarios(content).map_err(LabError::Catalog)?;
        Self::from_scenarios(scenarios)
    }

    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Result<Self> {
        let mut by_id = AHashMap::new();
        for (index, scenario) in scenarios.iter().enumerate() {
            if by_id.insert(scenario.id.clone(), index).is_some() {
                return Err(LabError::Catalog(format!(
                    "duplicate scenario id '{}'",
                    scenario.id
                )));
            }
        }
        Ok(Self { scenarios, by_id })
    }

    pub fn get(&self, id: &str) -> Result<&Scenario> {
        self.by_id
            .get(id)
            .map(|&i| &self.scenarios[i])
            .ok_or_else(|| LabError::UnknownScenario(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn summaries(&self) -> Vec<ScenarioSummary> {
        self.scenarios.iter().map(Scenario::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
