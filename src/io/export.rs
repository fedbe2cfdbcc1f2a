//! Flat tables for the exported files.
//!
//! Every exported column is looked up by name in the indexed dataset or in
//! the weight sensitivity table, so the index file and the weight scenario
//! file can never disagree about a district.

use std::collections::HashMap;

use crate::core::{Cell, Domain, ID_COLUMN, NAME_COLUMN};
use crate::errors::{IndexError, Result};
use crate::scoring::{IndexedDataset, COMPOSITE_COLUMN};
use crate::sensitivity::{
    delta_column, rank_column, score_column, LeaveOneOutTable, WeightSensitivityRow,
    WeightSensitivityTable, LEAVE_ONE_OUT_COLUMNS,
};

/// Descriptive columns exported when the input carries them, empty otherwise.
pub const CONTEXT_COLUMNS: [&str; 3] = ["einwohner", "flaeche_ha", "einwohnerdichte"];

#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Empty,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ExportValue {
    /// Text form used in CSV output: six decimals, NaN as empty.
    pub fn render(&self) -> String {
        match self {
            ExportValue::Empty => String::new(),
            ExportValue::Integer(value) => value.to_string(),
            ExportValue::Float(value) if value.is_nan() => String::new(),
            ExportValue::Float(value) => format!("{value:.6}"),
            ExportValue::Text(text) => text.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ExportValue::Empty => serde_json::Value::Null,
            ExportValue::Integer(value) => serde_json::Value::from(*value),
            ExportValue::Float(value) => Cell::Number(*value).to_json(),
            ExportValue::Text(text) => serde_json::Value::String(text.clone()),
        }
    }
}

impl From<Cell> for ExportValue {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Missing => ExportValue::Empty,
            Cell::Number(value) => ExportValue::Float(value),
            Cell::Text(text) => ExportValue::Text(text),
        }
    }
}

/// Rows of named values, plus the geometry of each row when it has one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ExportValue>>,
    pub geometries: Vec<Option<serde_json::Value>>,
}

impl ExportTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_geometry(&self) -> bool {
        self.geometries.iter().any(Option::is_some)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&ExportValue>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

/// Ordered column list of the main index export.
pub fn index_export_columns(
    indexed: &IndexedDataset,
    weights: &WeightSensitivityTable,
) -> Vec<String> {
    let mut columns: Vec<String> = [ID_COLUMN, NAME_COLUMN]
        .into_iter()
        .chain(CONTEXT_COLUMNS)
        .map(String::from)
        .collect();
    for (_, indicators) in indexed.indicators().iter() {
        for column in indicators {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }
    columns.extend(Domain::ALL.iter().map(|d| d.sub_index_column().to_string()));
    columns.push(COMPOSITE_COLUMN.to_string());
    columns.extend(
        weights
            .column_names()
            .into_iter()
            .filter(|c| c != ID_COLUMN && c != NAME_COLUMN),
    );
    columns
}

/// Main index export, in district order of `indexed`, merged with the
/// weight table by `bez_nr`.
pub fn index_export(
    indexed: &IndexedDataset,
    weights: &WeightSensitivityTable,
) -> Result<ExportTable> {
    let columns = index_export_columns(indexed, weights);
    let weight_rows: HashMap<i64, &WeightSensitivityRow> =
        weights.rows().iter().map(|r| (r.bez_nr, r)).collect();

    let mut rows = Vec::with_capacity(indexed.len());
    for district in indexed.districts() {
        let weight_row = weight_rows.get(&district.bez_nr()).ok_or_else(|| {
            IndexError::validation(format!(
                "District {ID_COLUMN}={} missing from the weight scenario table",
                district.bez_nr()
            ))
        })?;
        let row = columns
            .iter()
            .map(|column| {
                if column == ID_COLUMN {
                    return Ok(ExportValue::Integer(district.bez_nr()));
                }
                if let Some(value) = weight_value(weights, weight_row, column) {
                    return Ok(value);
                }
                match indexed.value(district, column) {
                    Some(cell) => Ok(cell.into()),
                    None if CONTEXT_COLUMNS.contains(&column.as_str()) => Ok(ExportValue::Empty),
                    None => Err(IndexError::missing_column(column.as_str())),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }
    integral_context_columns(&columns, &mut rows);

    Ok(ExportTable {
        columns,
        rows,
        geometries: indexed
            .districts()
            .iter()
            .map(|d| d.record.geometry.clone())
            .collect(),
    })
}

// Context columns holding only whole numbers are written as integers
fn integral_context_columns(columns: &[String], rows: &mut [Vec<ExportValue>]) {
    for (idx, column) in columns.iter().enumerate() {
        if !CONTEXT_COLUMNS.contains(&column.as_str()) {
            continue;
        }
        let integral = !rows.is_empty()
            && rows.iter().all(|row| {
                matches!(row[idx], ExportValue::Float(v)
                    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            });
        if !integral {
            continue;
        }
        for row in rows.iter_mut() {
            if let ExportValue::Float(value) = row[idx] {
                row[idx] = ExportValue::Integer(value as i64);
            }
        }
    }
}

/// Weight scenario export, sorted by the baseline rank.
pub fn weight_scenarios_export(table: &WeightSensitivityTable) -> ExportTable {
    let columns = table.column_names();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| match column.as_str() {
                    ID_COLUMN => ExportValue::Integer(row.bez_nr),
                    NAME_COLUMN => ExportValue::Text(row.name.clone()),
                    other => weight_value(table, row, other).unwrap_or(ExportValue::Empty),
                })
                .collect()
        })
        .collect();
    ExportTable {
        geometries: vec![None; table.len()],
        columns,
        rows,
    }
}

pub fn leave_one_out_export(table: &LeaveOneOutTable) -> ExportTable {
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            vec![
                ExportValue::Text(row.dimension.key().to_string()),
                ExportValue::Text(row.removed_indicator.clone()),
                ExportValue::Float(row.spearman_rho),
                ExportValue::Float(row.p_value),
            ]
        })
        .collect();
    ExportTable {
        columns: LEAVE_ONE_OUT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
        geometries: vec![None; table.len()],
    }
}

// Scores are floats, ranks and deltas integers
fn weight_value(
    table: &WeightSensitivityTable,
    row: &WeightSensitivityRow,
    column: &str,
) -> Option<ExportValue> {
    for (i, scenario) in table.scenarios().iter().enumerate() {
        if column == score_column(scenario) {
            return Some(ExportValue::Float(row.scores[i]));
        }
        if column == rank_column(scenario) {
            return Some(ExportValue::Integer(i64::from(row.ranks[i])));
        }
    }
    table
        .compared_scenarios()
        .into_iter()
        .position(|scenario| column == delta_column(scenario))
        .map(|i| ExportValue::Integer(row.deltas[i]))
}
