//! Common type definitions used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::IndexError;

/// Indicator domain. Iteration order is always green, sport, mob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Green,
    Sport,
    Mob,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Green, Domain::Sport, Domain::Mob];

    /// Configuration key of the domain
    pub fn key(&self) -> &'static str {
        match self {
            Domain::Green => "green",
            Domain::Sport => "sport",
            Domain::Mob => "mob",
        }
    }

    /// Column label of the domain's sub-index in exported tables
    pub fn sub_index_column(&self) -> &'static str {
        match self {
            Domain::Green => "index_gruen",
            Domain::Sport => "index_sport",
            Domain::Mob => "index_mobil",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Domain {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(Domain::Green),
            "sport" => Ok(Domain::Sport),
            "mob" => Ok(Domain::Mob),
            other => Err(IndexError::invalid_argument(format!(
                "Unknown domain: {other} (expected green, sport or mob)"
            ))),
        }
    }
}

/// A single raw table value.
///
/// Values arrive from CSV or GeoJSON untyped. Numeric coercion happens on
/// read through [`Cell::as_number`] and never fails: anything that is not a
/// finite number is treated as missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Parse a raw textual field: blank is missing, numbers are numbers.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    /// Numeric coercion. Non-numeric text and non-finite numbers are `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Missing => None,
            Cell::Number(value) => Some(*value).filter(|v| v.is_finite()),
            Cell::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Missing,
            serde_json::Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or_default(),
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Cell::Missing => serde_json::Value::Null,
            Cell::Number(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Cell::Text(text) => serde_json::Value::String(text.clone()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or_default()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Text(text) => f.write_str(text),
        }
    }
}
