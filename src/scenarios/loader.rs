//! Parse scenario definitions from TOML

use crate::core::types::{ActionKind, Axis, CognitiveFocus, Difficulty, ResourceVector};
use crate::scenarios::catalog::Scenario;
use crate::scenarios::effects::{
    ActionEffect, CurveMode, DelaySpec, DifficultyProfile, SaturationCurve, Tier, YieldSpec,
};
use std::collections::BTreeMap;

/// Parse every `[[scenarios]]` entry of a catalogue file
pub fn parse_scenarios(content: &str) -> Result<Vec<Scenario>, String> {
    let toml: toml::Value = content
        .parse()
        .map_err(|e| format!("Invalid TOML: {}", e))?;

    let entries = toml
        .get("scenarios")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "catalogue has no [[scenarios]] entries".to_string())?;

    entries.iter().map(parse_scenario).collect()
}

fn parse_scenario(value: &toml::Value) -> Result<Scenario, String> {
    let id = required_str(value, "id", "scenario")?;
    let ctx = format!("scenario '{}'", id);

    let focus_str = required_str(value, "cognitive_focus", &ctx)?;
    let cognitive_focus = CognitiveFocus::parse(&focus_str)
        .ok_or_else(|| format!("{}: unknown cognitive_focus '{}'", ctx, focus_str))?;

    let max_turns = value
        .get("max_turns")
        .and_then(|v| v.as_integer())
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("{}: max_turns must be a positive integer", ctx))?
        as u32;

    let initial_state = match value.get("initial_state") {
        Some(state) => parse_state(state, &ctx)?,
        None => ResourceVector::default(),
    };

    let mut difficulties = BTreeMap::new();
    if let Some(table) = value.get("difficulty").and_then(|v| v.as_table()) {
        for (name, profile) in table {
            let difficulty = Difficulty::parse(name)
                .ok_or_else(|| format!("{}: unknown difficulty '{}'", ctx, name))?;
            difficulties.insert(difficulty, parse_profile(profile));
        }
    }
    if difficulties.is_empty() {
        return Err(format!("{}: no difficulty offered", ctx));
    }

    let mut actions = Vec::new();
    let table = value
        .get("actions")
        .and_then(|v| v.as_table())
        .ok_or_else(|| format!("{}: missing actions", ctx))?;
    for (name, action) in table {
        actions.push(parse_action(name, action, &ctx)?);
    }
    if actions.is_empty() {
        return Err(format!("{}: no actions", ctx));
    }

    Ok(Scenario {
        id: id.clone(),
        name: required_str(value, "name", &ctx)?,
        description: optional_str(value, "description"),
        long_description: optional_str(value, "long_description"),
        cognitive_focus,
        max_turns,
        initial_state: initial_state.clamped(),
        actions,
        difficulties,
    })
}

fn parse_state(value: &toml::Value, ctx: &str) -> Result<ResourceVector, String> {
    let field = |key: &str, default: i64| -> Result<i64, String> {
        match value.get(key) {
            Some(v) => v
                .as_integer()
                .ok_or_else(|| format!("{}: initial_state.{} must be an integer", ctx, key)),
            None => Ok(default),
        }
    };
    let defaults = ResourceVector::default();
    Ok(ResourceVector::new(
        field("resources", defaults.resources)?,
        field("satisfaction", defaults.satisfaction)?,
        field("reputation", defaults.reputation)?,
        field("knowledge", defaults.knowledge)?,
    ))
}

fn parse_profile(value: &toml::Value) -> DifficultyProfile {
    let defaults = DifficultyProfile::default();
    DifficultyProfile {
        immediate_multiplier: number(value, "immediate_multiplier")
            .unwrap_or(defaults.immediate_multiplier),
        delayed_multiplier: number(value, "delayed_multiplier")
            .unwrap_or(defaults.delayed_multiplier),
        cost_multiplier: number(value, "cost_multiplier").unwrap_or(defaults.cost_multiplier),
        delay_shift: value
            .get("delay_shift")
            .and_then(|v| v.as_integer())
            .map(|n| n.max(0) as u32)
            .unwrap_or(defaults.delay_shift),
        saturation_onset: number(value, "saturation_onset").unwrap_or(defaults.saturation_onset),
    }
}

fn parse_action(name: &str, value: &toml::Value, ctx: &str) -> Result<ActionEffect, String> {
    let kind = ActionKind::parse(name).ok_or_else(|| format!("{}: unknown action '{}'", ctx, name))?;
    let ctx = format!("{} action '{}'", ctx, name);

    let axis_str = required_str(value, "axis", &ctx)?;
    let axis = Axis::parse(&axis_str).ok_or_else(|| format!("{}: unknown axis '{}'", ctx, axis_str))?;

    let max_amount = value
        .get("max_amount")
        .and_then(|v| v.as_integer())
        .filter(|n| *n >= 0)
        .ok_or_else(|| format!("{}: missing max_amount", ctx))? as u32;

    let linear_rate =
        number(value, "linear_rate").ok_or_else(|| format!("{}: missing linear_rate", ctx))?;

    let delay = match value.get("delay") {
        Some(delay) => Some(parse_delay(delay, &ctx)?),
        None => None,
    };

    let yield_spec = value.get("yield").map(|y| YieldSpec {
        capital_per_unit: number(y, "capital_per_unit").unwrap_or(0.0),
        base_pct: number(y, "base_pct").unwrap_or(0.0),
        knowledge_pct: number(y, "knowledge_pct").unwrap_or(0.0),
        bias_drag_pct: number(y, "bias_drag_pct").unwrap_or(0.0),
    });

    Ok(ActionEffect {
        kind,
        description: optional_str(value, "description"),
        axis,
        max_amount,
        cost_per_unit: number(value, "cost_per_unit").unwrap_or(0.0),
        linear_rate,
        curve: parse_curve(value, linear_rate, &ctx)?,
        delay,
        yield_spec,
        bias_per_unit: number(value, "bias_per_unit").unwrap_or(0.0),
    })
}

fn parse_curve(value: &toml::Value, linear_rate: f64, ctx: &str) -> Result<SaturationCurve, String> {
    let Some(tiers) = value.get("tiers").and_then(|v| v.as_array()) else {
        return Ok(SaturationCurve::linear(linear_rate));
    };

    let mode = match value.get("curve").and_then(|v| v.as_str()).unwrap_or("marginal") {
        "regime" => CurveMode::Regime,
        "marginal" => CurveMode::Marginal,
        other => return Err(format!("{}: unknown curve '{}'", ctx, other)),
    };

    let mut parsed = Vec::with_capacity(tiers.len());
    let mut last_knee = 0.0;
    for tier in tiers {
        let rate = number(tier, "rate").ok_or_else(|| format!("{}: tier missing rate", ctx))?;
        let up_to = number(tier, "up_to");
        if let Some(knee) = up_to {
            if knee <= last_knee {
                return Err(format!("{}: tier knees must increase", ctx));
            }
            last_knee = knee;
        }
        parsed.push(Tier { up_to, rate });
    }

    if parsed.is_empty() {
        return Err(format!("{}: tiers must not be empty", ctx));
    }
    if parsed.last().map_or(false, |t| t.up_to.is_some()) {
        return Err(format!("{}: last tier must be unbounded", ctx));
    }

    Ok(SaturationCurve { mode, tiers: parsed })
}

fn parse_delay(value: &toml::Value, ctx: &str) -> Result<DelaySpec, String> {
    let turns = value
        .get("turns")
        .and_then(|v| v.as_integer())
        .filter(|n| *n >= 1)
        .ok_or_else(|| format!("{}: delay.turns must be at least 1", ctx))? as u32;

    let axis_str = required_str(value, "axis", ctx)?;
    let axis = Axis::parse(&axis_str)
        .ok_or_else(|| format!("{}: unknown delay axis '{}'", ctx, axis_str))?;

    Ok(DelaySpec {
        turns,
        axis,
        rate: number(value, "rate").ok_or_else(|| format!("{}: delay missing rate", ctx))?,
        cap: value
            .get("cap")
            .and_then(|v| v.as_integer())
            .unwrap_or(i64::MAX),
    })
}

/// Integer or float field as f64
fn number(value: &toml::Value, key: &str) -> Option<f64> {
    value
        .get(key)
        .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
}

fn required_str(value: &toml::Value, key: &str, ctx: &str) -> Result<String, String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| format!("{}: missing {}", ctx, key))
}

fn optional_str(value: &toml::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[[scenarios]]
id = "toy"
name = "Toy"
cognitive_focus = "time-delay"
max_turns = 5

[scenarios.difficulty.beginner]

[scenarios.actions.gift]
axis = "satisfaction"
max_amount = 3
linear_rate = 2

[scenarios.actions.gift.delay]
turns = 2
axis = "reputation"
rate = 1.5
"#;

    #[test]
    fn test_parse_minimal_scenario() {
        let scenarios = parse_scenarios(MINIMAL).unwrap();
        assert_eq!(scenarios.len(), 1);
        let toy = &scenarios[0];
        assert_eq!(toy.initial_state, ResourceVector::default());
        assert_eq!(toy.difficulties[&Difficulty::Beginner], DifficultyProfile::default());

        let gift = &toy.actions[0];
        assert_eq!(gift.kind, ActionKind::Gift);
        assert_eq!(gift.curve, SaturationCurve::linear(2.0));
        let delay = gift.delay.unwrap();
        assert_eq!(delay.axis, Axis::Reputation);
        assert_eq!(delay.cap, i64::MAX);
    }

    #[test]
    fn test_parse_tiers_accepts_integers() {
        let toml_str = r#"
axis = "satisfaction"
max_amount = 10
linear_rate = 8
curve = "regime"
tiers = [{ up_to = 3, rate = 8 }, { rate = 2.5 }]
"#;
        let value: toml::Value = toml_str.parse().unwrap();
        let action = parse_action("hire_staff", &value, "test").unwrap();
        assert_eq!(action.curve.mode, CurveMode::Regime);
        assert_eq!(action.curve.tiers[0].up_to, Some(3.0));
        assert_eq!(action.curve.tiers[1].rate, 2.5);
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let unknown_action = MINIMAL.replace("actions.gift", "actions.juggle");
        assert!(parse_scenarios(&unknown_action).unwrap_err().contains("juggle"));

        let bad_focus = MINIMAL.replace("time-delay", "optimism");
        assert!(parse_scenarios(&bad_focus).is_err());

        let no_difficulty = MINIMAL.replace("[scenarios.difficulty.beginner]", "");
        assert!(parse_scenarios(&no_difficulty).unwrap_err().contains("difficulty"));
    }

    #[test]
    fn test_rejects_bounded_last_tier() {
        let toml_str = r#"
axis = "satisfaction"
max_amount = 10
linear_rate = 1
tiers = [{ up_to = 3, rate = 1 }]
"#;
        let value: toml::Value = toml_str.parse().unwrap();
        assert!(parse_action("gift", &value, "test").unwrap_err().contains("unbounded"));
    }
}
