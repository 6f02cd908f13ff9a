//! Scenario files: systems, events, parameter overrides and scripted trades.

use crate::catalog::SystemCatalog;
use serde::Deserialize;
use sim_core::{
    validate_params, validate_world, ActiveEvent, Day, EconParams, Good, SystemDescriptor,
    SystemId, ValidationError,
};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scenario yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("scripted trade on day {day} targets unknown system {system}")]
    UnknownTradeSystem { day: Day, system: SystemId },
}

/// A trade replayed on a given day. Negative quantities are buys.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScriptedTrade {
    pub day: Day,
    pub system: SystemId,
    pub good: Good,
    pub quantity: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub params: EconParams,
    #[serde(default)]
    pub start_day: Day,
    pub systems: Vec<SystemDescriptor>,
    #[serde(default)]
    pub events: Vec<ActiveEvent>,
    #[serde(default)]
    pub trades: Vec<ScriptedTrade>,
}

impl Scenario {
    pub fn from_yaml_str(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let scenario = Self::from_yaml_str(&fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            systems = scenario.systems.len(),
            events = scenario.events.len(),
            trades = scenario.trades.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        validate_params(&self.params)?;
        validate_world(&self.systems, &self.events)?;
        for t in &self.trades {
            if !self.systems.iter().any(|s| s.id == t.system) {
                return Err(ScenarioError::UnknownTradeSystem {
                    day: t.day,
                    system: t.system,
                });
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> Result<SystemCatalog, ValidationError> {
        SystemCatalog::from_systems(self.systems.iter().cloned())
    }
}
