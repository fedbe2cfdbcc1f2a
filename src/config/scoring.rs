//! Domain weight configuration for the composite index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::Domain;
use crate::errors::{IndexError, Result};

/// Absolute tolerance on the weight sum
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weight per domain.
///
/// Construction does not validate; [`WeightConfig::validate`] runs wherever
/// weights are consumed so that an invalid table is rejected before any
/// output is produced. Read from a map (TOML, scenario files), all three
/// domain keys are required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct WeightConfig {
    pub green: f64,
    pub sport: f64,
    pub mob: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::equal()
    }
}

impl WeightConfig {
    pub fn new(green: f64, sport: f64, mob: f64) -> Self {
        Self { green, sport, mob }
    }

    /// One third per domain
    pub fn equal() -> Self {
        Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }

    /// Half the weight on `domain`, a quarter on each of the others
    pub fn focus(domain: Domain) -> Self {
        match domain {
            Domain::Green => Self::new(0.5, 0.25, 0.25),
            Domain::Sport => Self::new(0.25, 0.5, 0.25),
            Domain::Mob => Self::new(0.25, 0.25, 0.5),
        }
    }

    /// Build from a domain-keyed map, requiring exactly the three domains.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Result<Self> {
        let missing: Vec<&str> = Domain::ALL
            .iter()
            .map(|d| d.key())
            .filter(|key| !map.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(IndexError::validation(format!(
                "Missing weight keys: {missing:?}"
            )));
        }

        let unknown: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|key| key.parse::<Domain>().is_err())
            .collect();
        if !unknown.is_empty() {
            return Err(IndexError::validation(format!(
                "Unknown weight keys: {unknown:?}"
            )));
        }

        Ok(Self::new(map["green"], map["sport"], map["mob"]))
    }

    pub fn weight(&self, domain: Domain) -> f64 {
        match domain {
            Domain::Green => self.green,
            Domain::Sport => self.sport,
            Domain::Mob => self.mob,
        }
    }

    pub fn sum(&self) -> f64 {
        self.green + self.sport + self.mob
    }

    // Pure function: Check the sum is within tolerance of 1.0
    pub fn sums_to_one(sum: f64) -> bool {
        (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    /// Validate that weights sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`]
    pub fn validate(&self) -> Result<()> {
        let total = self.sum();
        if Self::sums_to_one(total) {
            Ok(())
        } else {
            Err(IndexError::validation(format!(
                "Weights must sum to 1.0, got {total:.6}"
            )))
        }
    }

    /// Weighted sum of three domain values, always in green, sport, mob order.
    pub fn combine(&self, green: f64, sport: f64, mob: f64) -> f64 {
        self.green * green + self.sport * sport + self.mob * mob
    }
}

impl TryFrom<BTreeMap<String, f64>> for WeightConfig {
    type Error = IndexError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self> {
        Self::from_map(&map)
    }
}

impl From<WeightConfig> for BTreeMap<String, f64> {
    fn from(weights: WeightConfig) -> Self {
        Domain::ALL
            .iter()
            .map(|d| (d.key().to_string(), weights.weight(*d)))
            .collect()
    }
}
