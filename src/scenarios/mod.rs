//! Static scenario definitions and their effect parameters

pub mod catalog;
pub mod effects;
pub mod loader;

pub use catalog::{Scenario, ScenarioCatalog, ScenarioSummary};
pub use effects::{
    ActionEffect, CurveMode, DelaySpec, DifficultyProfile, SaturationCurve, Tier, YieldSpec,
};
