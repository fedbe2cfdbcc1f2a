//! Per-column rescaling of raw indicator values.
//!
//! Degenerate inputs (all missing, zero range, zero spread) normalize to a
//! column of zeros: a column without discriminating signal contributes
//! nothing to a sub-index instead of poisoning it with NaN.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::Cell;
use crate::errors::{IndexError, Result};

/// Ranges and deviations at or below this are treated as zero
pub const DEGENERATE_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormMethod {
    /// (x - min) / (max - min)
    #[default]
    MinMax,
    /// (x - mean) / sample standard deviation
    ZScore,
}

impl NormMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormMethod::MinMax => "minmax",
            NormMethod::ZScore => "zscore",
        }
    }
}

impl fmt::Display for NormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormMethod {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minmax" => Ok(NormMethod::MinMax),
            "zscore" => Ok(NormMethod::ZScore),
            other => Err(IndexError::invalid_argument(format!(
                "Unknown method: {other}"
            ))),
        }
    }
}

/// Normalize raw cells with a method given by name.
///
/// Non-numeric cells are coerced to missing first.
pub fn normalize_series(cells: &[Cell], method: &str) -> Result<Vec<Option<f64>>> {
    let method = method.parse::<NormMethod>()?;
    let values: Vec<Option<f64>> = cells.iter().map(Cell::as_number).collect();
    Ok(normalize(&values, method))
}

/// Normalize a column, ignoring missing (and non-finite) entries for the
/// statistics. Missing entries stay missing unless the column is
/// degenerate, in which case every entry becomes `0.0`.
pub fn normalize(values: &[Option<f64>], method: NormMethod) -> Vec<Option<f64>> {
    let present: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();

    let scale = match method {
        NormMethod::MinMax => min_max_scale(&present),
        NormMethod::ZScore => z_score_scale(&present),
    };

    match scale {
        Some((offset, divisor)) => values
            .iter()
            .map(|v| v.filter(|x| x.is_finite()).map(|x| (x - offset) / divisor))
            .collect(),
        None => vec![Some(0.0); values.len()],
    }
}

/// Normalize a fully populated column.
pub fn normalize_filled(values: &[f64], method: NormMethod) -> Vec<f64> {
    let wrapped: Vec<Option<f64>> = values.iter().map(|v| Some(*v)).collect();
    normalize(&wrapped, method)
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect()
}

// (offset, divisor) for min-max scaling, None when the range is degenerate
fn min_max_scale(present: &[f64]) -> Option<(f64, f64)> {
    let min = present.iter().copied().reduce(f64::min)?;
    let max = present.iter().copied().reduce(f64::max)?;
    let range = max - min;
    (range.abs() > DEGENERATE_TOLERANCE).then_some((min, range))
}

// (offset, divisor) for z-scores, None with fewer than two values or ~zero spread
fn z_score_scale(present: &[f64]) -> Option<(f64, f64)> {
    if present.len() < 2 {
        return None;
    }
    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    (std.is_finite() && std > DEGENERATE_TOLERANCE).then_some((mean, std))
}
