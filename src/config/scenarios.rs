//! Named weight scenarios for the weight-sensitivity table.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::scoring::WeightConfig;
use crate::core::Domain;
use crate::errors::{IndexError, Result};

/// Scenario every other scenario is compared against
pub const BASELINE_SCENARIO: &str = "equal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightScenario {
    pub name: String,
    pub weights: WeightConfig,
}

impl WeightScenario {
    pub fn new(name: impl Into<String>, weights: WeightConfig) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }

    pub fn is_baseline(&self) -> bool {
        self.name == BASELINE_SCENARIO
    }
}

/// Ordered collection of uniquely named scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSet {
    scenarios: Vec<WeightScenario>,
}

impl Default for ScenarioSet {
    /// `equal`, `green_focus`, `sport_focus`, `mob_focus`
    fn default() -> Self {
        let mut scenarios = vec![WeightScenario::new(BASELINE_SCENARIO, WeightConfig::equal())];
        scenarios.extend(
            Domain::ALL
                .iter()
                .map(|d| WeightScenario::new(format!("{}_focus", d.key()), WeightConfig::focus(*d))),
        );
        Self { scenarios }
    }
}

impl ScenarioSet {
    pub fn new(scenarios: Vec<WeightScenario>) -> Result<Self> {
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if scenario.name.trim().is_empty() {
                return Err(IndexError::validation("Scenario name must not be empty"));
            }
            if !seen.insert(scenario.name.as_str()) {
                return Err(IndexError::validation(format!(
                    "Duplicate scenario: {}",
                    scenario.name
                )));
            }
        }
        Ok(Self { scenarios })
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightScenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&WeightScenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Position of the `equal` scenario.
    pub fn baseline_index(&self) -> Result<usize> {
        self.scenarios
            .iter()
            .position(WeightScenario::is_baseline)
            .ok_or_else(|| {
                IndexError::MissingScenario(format!(
                    "a scenario named `{BASELINE_SCENARIO}` is required for rank deltas"
                ))
            })
    }

    /// Validate every scenario's weights.
    pub fn validate(&self) -> Result<()> {
        for scenario in &self.scenarios {
            scenario.weights.validate().map_err(|e| {
                IndexError::validation(format!("scenario `{}`: {}", scenario.name, inner(&e)))
            })?;
        }
        Ok(())
    }
}

fn inner(err: &IndexError) -> String {
    match err {
        IndexError::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenarios() {
        let set = ScenarioSet::default();
        assert_eq!(
            set.names(),
            vec!["equal", "green_focus", "sport_focus", "mob_focus"]
        );
        assert_eq!(set.baseline_index().unwrap(), 0);
        assert!(set.validate().is_ok());
        assert_eq!(
            set.get("sport_focus").unwrap().weights,
            WeightConfig::new(0.25, 0.5, 0.25)
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = ScenarioSet::new(vec![
            WeightScenario::new("equal", WeightConfig::equal()),
            WeightScenario::new("equal", WeightConfig::focus(Domain::Mob)),
        ]);
        assert!(matches!(result, Err(IndexError::Validation(_))));
    }

    #[test]
    fn test_missing_baseline() {
        let set = ScenarioSet::new(vec![WeightScenario::new(
            "green_focus",
            WeightConfig::focus(Domain::Green),
        )])
        .unwrap();
        assert!(matches!(
            set.baseline_index(),
            Err(IndexError::MissingScenario(_))
        ));
    }

    #[test]
    fn test_invalid_scenario_named_in_error() {
        let set = ScenarioSet::new(vec![
            WeightScenario::new("equal", WeightConfig::equal()),
            WeightScenario::new("broken", WeightConfig::new(0.5, 0.5, 0.5)),
        ])
        .unwrap();
        let err = set.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: scenario `broken`: Weights must sum to 1.0, got 1.500000"
        );
    }
}
