use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::indicators::IndicatorConfig;
use super::scenarios::{ScenarioSet, WeightScenario};
use super::scoring::WeightConfig;
use crate::errors::Result;
use crate::scoring::{IndexOptions, NormMethod};

/// Root configuration structure, read from `.active-city.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ActiveCityConfig {
    /// Indicator columns per domain
    #[serde(default)]
    pub indicators: Option<IndicatorConfig>,

    /// Baseline domain weights for the composite index
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    /// Weight scenarios for the sensitivity table, in order
    #[serde(default)]
    pub scenarios: Option<Vec<WeightScenario>>,

    /// Normalization and missing-value handling
    #[serde(default)]
    pub index: Option<IndexSettings>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IndexSettings {
    pub norm_method: Option<NormMethod>,
    pub fill_missing: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// Directory the build command writes into
    pub directory: Option<PathBuf>,
    /// Number of districts shown in the terminal summary
    pub top: Option<usize>,
}

impl ActiveCityConfig {
    pub fn indicators(&self) -> IndicatorConfig {
        self.indicators.clone().unwrap_or_default()
    }

    pub fn weights(&self) -> WeightConfig {
        self.weights.unwrap_or_default()
    }

    pub fn scenario_set(&self) -> Result<ScenarioSet> {
        match &self.scenarios {
            Some(scenarios) => ScenarioSet::new(scenarios.clone()),
            None => Ok(ScenarioSet::default()),
        }
    }

    pub fn index_options(&self) -> IndexOptions {
        let defaults = IndexOptions::default();
        let settings = self.index.clone().unwrap_or_default();
        IndexOptions {
            norm_method: settings.norm_method.unwrap_or(defaults.norm_method),
            fill_missing: settings.fill_missing.unwrap_or(defaults.fill_missing),
        }
    }

    pub fn output_directory(&self) -> Option<PathBuf> {
        self.output.as_ref().and_then(|o| o.directory.clone())
    }

    pub fn top(&self) -> Option<usize> {
        self.output.as_ref().and_then(|o| o.top)
    }

    /// Validate everything that can be checked without a dataset.
    pub fn validate(&self) -> Result<()> {
        self.weights().validate()?;
        self.indicators().ensure_non_empty()?;
        self.scenario_set()?.validate()?;
        self.index_options().validate()
    }
}
