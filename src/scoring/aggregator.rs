//! Sub-index and composite index computation.
//!
//! Every indicator column is coerced to numbers, filled, and normalized on
//! its own. A domain's sub-index is the row-wise mean of its normalized
//! columns; the composite is the weighted sum of the three sub-indices.

use serde::Serialize;
use std::collections::BTreeMap;

use super::normalizer::{normalize_filled, NormMethod};
use crate::config::{IndicatorConfig, WeightConfig};
use crate::core::{Cell, Dataset, DistrictRecord, Domain, ID_COLUMN, NAME_COLUMN};
use crate::errors::{IndexError, Result};

/// Column holding the composite index
pub const COMPOSITE_COLUMN: &str = "active_city_index";
/// Suffix of derived normalized indicator columns
pub const NORMALIZED_SUFFIX: &str = "_norm";

/// Normalization method and fill value for missing indicator entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexOptions {
    pub norm_method: NormMethod,
    pub fill_missing: f64,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            norm_method: NormMethod::MinMax,
            fill_missing: 0.0,
        }
    }
}

impl IndexOptions {
    pub fn validate(&self) -> Result<()> {
        if self.fill_missing.is_finite() {
            Ok(())
        } else {
            Err(IndexError::validation(format!(
                "fill value must be finite, got {}",
                self.fill_missing
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubIndices {
    pub green: f64,
    pub sport: f64,
    pub mob: f64,
}

impl SubIndices {
    pub fn get(&self, domain: Domain) -> f64 {
        match domain {
            Domain::Green => self.green,
            Domain::Sport => self.sport,
            Domain::Mob => self.mob,
        }
    }

    /// Weighted sum of the three sub-indices.
    pub fn composite(&self, weights: &WeightConfig) -> f64 {
        weights.combine(self.green, self.sport, self.mob)
    }
}

/// One district with its filled indicator values and derived scores.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDistrict {
    pub record: DistrictRecord,
    /// Normalized value per indicator column (keyed by the raw column name)
    pub normalized: BTreeMap<String, f64>,
    pub sub_indices: SubIndices,
    pub active_city_index: f64,
}

impl IndexedDistrict {
    pub fn bez_nr(&self) -> i64 {
        self.record.bez_nr
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }
}

/// Input dataset augmented with normalized columns, sub-indices and the
/// composite index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDataset {
    columns: Vec<String>,
    districts: Vec<IndexedDistrict>,
    indicators: IndicatorConfig,
    weights: WeightConfig,
    options: IndexOptions,
}

impl IndexedDataset {
    pub fn districts(&self) -> &[IndexedDistrict] {
        &self.districts
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    pub fn indicators(&self) -> &IndicatorConfig {
        &self.indicators
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    pub fn has_geometry(&self) -> bool {
        self.districts.iter().any(|d| d.record.geometry.is_some())
    }

    pub fn composite_scores(&self) -> Vec<f64> {
        self.districts.iter().map(|d| d.active_city_index).collect()
    }

    pub fn sub_index(&self, domain: Domain) -> Vec<f64> {
        self.districts
            .iter()
            .map(|d| d.sub_indices.get(domain))
            .collect()
    }

    /// `(bez_nr, composite)` pairs in district order.
    pub fn composite_by_id(&self) -> Vec<(i64, f64)> {
        self.districts
            .iter()
            .map(|d| (d.bez_nr(), d.active_city_index))
            .collect()
    }

    pub fn find(&self, bez_nr: i64) -> Option<&IndexedDistrict> {
        self.districts.iter().find(|d| d.bez_nr() == bez_nr)
    }

    /// Every column this dataset can populate by name.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![ID_COLUMN.to_string(), NAME_COLUMN.to_string()];
        names.extend(self.columns.iter().cloned());
        names.extend(
            self.indicators
                .all_columns()
                .into_iter()
                .map(|c| format!("{c}{NORMALIZED_SUFFIX}")),
        );
        names.extend(Domain::ALL.iter().map(|d| d.sub_index_column().to_string()));
        names.push(COMPOSITE_COLUMN.to_string());
        names
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names().iter().any(|c| c == column)
    }

    /// Value of a named column for one district, `None` for unknown columns.
    pub fn value(&self, district: &IndexedDistrict, column: &str) -> Option<Cell> {
        match column {
            ID_COLUMN => return Some(Cell::Number(district.bez_nr() as f64)),
            NAME_COLUMN => return Some(Cell::Text(district.name().to_string())),
            COMPOSITE_COLUMN => return Some(Cell::Number(district.active_city_index)),
            _ => {}
        }
        if let Some(domain) = Domain::ALL
            .into_iter()
            .find(|d| d.sub_index_column() == column)
        {
            return Some(Cell::Number(district.sub_indices.get(domain)));
        }
        if let Some(value) = column
            .strip_suffix(NORMALIZED_SUFFIX)
            .and_then(|raw| district.normalized.get(raw))
        {
            return Some(Cell::Number(*value));
        }
        self.columns
            .iter()
            .any(|c| c == column)
            .then(|| district.record.value(column).clone())
    }

    /// Whole column by name, `None` for unknown columns.
    pub fn column(&self, column: &str) -> Option<Vec<Cell>> {
        if !self.has_column(column) {
            return None;
        }
        self.districts
            .iter()
            .map(|d| self.value(d, column))
            .collect()
    }
}

/// Compute sub-indices and the composite index without touching `dataset`.
pub fn compute_index(
    dataset: &Dataset,
    indicators: &IndicatorConfig,
    weights: &WeightConfig,
    options: &IndexOptions,
) -> Result<IndexedDataset> {
    validate_inputs(dataset, indicators, weights, options)?;
    build_index(dataset.clone(), indicators, weights, options)
}

/// Same as [`compute_index`] but consumes the dataset, rewriting its
/// indicator columns in place instead of copying them.
pub fn compute_index_owned(
    dataset: Dataset,
    indicators: &IndicatorConfig,
    weights: &WeightConfig,
    options: &IndexOptions,
) -> Result<IndexedDataset> {
    validate_inputs(&dataset, indicators, weights, options)?;
    build_index(dataset, indicators, weights, options)
}

fn validate_inputs(
    dataset: &Dataset,
    indicators: &IndicatorConfig,
    weights: &WeightConfig,
    options: &IndexOptions,
) -> Result<()> {
    weights.validate()?;
    options.validate()?;
    indicators.ensure_non_empty()?;
    match indicators
        .all_columns()
        .into_iter()
        .find(|column| !dataset.has_column(column))
    {
        Some(column) => Err(IndexError::missing_column(column)),
        None => Ok(()),
    }
}

fn build_index(
    mut dataset: Dataset,
    indicators: &IndicatorConfig,
    weights: &WeightConfig,
    options: &IndexOptions,
) -> Result<IndexedDataset> {
    let mut normalized: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for column in indicators.all_columns() {
        let filled: Vec<f64> = dataset
            .numeric_column(column)?
            .into_iter()
            .map(|v| v.unwrap_or(options.fill_missing))
            .collect();
        let scaled = normalize_filled(&filled, options.norm_method);
        log::debug!(
            "Normalized {column} ({}) over {} districts",
            options.norm_method,
            filled.len()
        );
        dataset.set_column(column, filled.into_iter().map(Cell::Number).collect());
        normalized.insert(column.to_string(), scaled);
    }

    let (columns, records) = dataset.into_parts();
    let districts = records
        .into_iter()
        .enumerate()
        .map(|(row, record)| {
            let sub_index = |domain: Domain| {
                let columns = indicators.columns(domain);
                let total: f64 = columns.iter().map(|c| normalized[c.as_str()][row]).sum();
                total / columns.len() as f64
            };
            let sub_indices = SubIndices {
                green: sub_index(Domain::Green),
                sport: sub_index(Domain::Sport),
                mob: sub_index(Domain::Mob),
            };
            let row_normalized = normalized
                .iter()
                .map(|(column, values)| (column.clone(), values[row]))
                .collect();
            IndexedDistrict {
                record,
                normalized: row_normalized,
                active_city_index: sub_indices.composite(weights),
                sub_indices,
            }
        })
        .collect();

    Ok(IndexedDataset {
        columns,
        districts,
        indicators: indicators.clone(),
        weights: *weights,
        options: *options,
    })
}
