//! Indicator configuration: which columns feed which domain.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::Domain;
use crate::errors::{IndexError, Result};

/// Mapping from each domain to its ordered list of indicator columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorConfig {
    pub green: Vec<String>,
    pub sport: Vec<String>,
    pub mob: Vec<String>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            green: default_green_indicators(),
            sport: default_sport_indicators(),
            mob: default_mob_indicators(),
        }
    }
}

impl IndicatorConfig {
    pub fn new(green: Vec<String>, sport: Vec<String>, mob: Vec<String>) -> Self {
        Self { green, sport, mob }
    }

    pub fn columns(&self, domain: Domain) -> &[String] {
        match domain {
            Domain::Green => &self.green,
            Domain::Sport => &self.sport,
            Domain::Mob => &self.mob,
        }
    }

    fn columns_mut(&mut self, domain: Domain) -> &mut Vec<String> {
        match domain {
            Domain::Green => &mut self.green,
            Domain::Sport => &mut self.sport,
            Domain::Mob => &mut self.mob,
        }
    }

    /// Domains paired with their columns, in green, sport, mob order.
    pub fn iter(&self) -> impl Iterator<Item = (Domain, &[String])> + '_ {
        Domain::ALL.into_iter().map(move |d| (d, self.columns(d)))
    }

    /// Every distinct column referenced by any domain, sorted.
    pub fn all_columns(&self) -> Vec<&str> {
        self.iter()
            .flat_map(|(_, columns)| columns.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of (domain, column) pairs.
    pub fn total_indicators(&self) -> usize {
        self.iter().map(|(_, columns)| columns.len()).sum()
    }

    /// Copy with `column` removed from `domain` only.
    pub fn without(&self, domain: Domain, column: &str) -> Self {
        let mut reduced = self.clone();
        reduced.columns_mut(domain).retain(|c| c != column);
        reduced
    }

    /// Every domain needs at least one indicator to have a sub-index.
    pub fn ensure_non_empty(&self) -> Result<()> {
        match self.iter().find(|(_, columns)| columns.is_empty()) {
            Some((domain, _)) => Err(IndexError::EmptyDomain(domain)),
            None => Ok(()),
        }
    }
}

pub fn default_green_indicators() -> Vec<String> {
    vec![
        "parks_pro_1000_einw".to_string(),
        "parks_area_anteil_prozent".to_string(),
    ]
}

pub fn default_sport_indicators() -> Vec<String> {
    vec![
        "sports_pro_1000_einw".to_string(),
        "sports_area_anteil_prozent".to_string(),
    ]
}

pub fn default_mob_indicators() -> Vec<String> {
    vec![
        "stops_pro_1000_einw".to_string(),
        "radweg_km_pro_km2".to_string(),
    ]
}
