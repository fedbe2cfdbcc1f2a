//! District table: one record per district, keyed by `bez_nr`.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::types::Cell;
use crate::errors::{IndexError, Result};

/// Column holding the district id
pub const ID_COLUMN: &str = "bez_nr";
/// Column holding the district name
pub const NAME_COLUMN: &str = "name";

static MISSING_CELL: Cell = Cell::Missing;

/// One administrative district with its raw values.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictRecord {
    pub bez_nr: i64,
    pub name: String,
    pub values: BTreeMap<String, Cell>,
    /// GeoJSON geometry carried through untouched
    pub geometry: Option<serde_json::Value>,
}

impl DistrictRecord {
    pub fn new(bez_nr: i64, name: impl Into<String>) -> Self {
        Self {
            bez_nr,
            name: name.into(),
            values: BTreeMap::new(),
            geometry: None,
        }
    }

    pub fn with_value(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn with_geometry(mut self, geometry: serde_json::Value) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Value of a column; absent entries read as missing.
    pub fn value(&self, column: &str) -> &Cell {
        self.values.get(column).unwrap_or(&MISSING_CELL)
    }
}

/// Ordered set of district records plus the ordered value-column schema.
///
/// A column exists when it is part of the schema. Records may omit schema
/// columns, which then read as missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<DistrictRecord>,
}

impl Dataset {
    /// Build a dataset with an explicit schema.
    ///
    /// Fails on duplicate district ids, duplicate column names and on
    /// schema entries that shadow the id/name columns.
    pub fn new(columns: Vec<String>, records: Vec<DistrictRecord>) -> Result<Self> {
        let mut seen_columns = HashSet::new();
        for column in &columns {
            if column == ID_COLUMN || column == NAME_COLUMN {
                return Err(IndexError::validation(format!(
                    "`{column}` is a key column and cannot be a value column"
                )));
            }
            if !seen_columns.insert(column.as_str()) {
                return Err(IndexError::validation(format!(
                    "Duplicate column: {column}"
                )));
            }
        }

        let mut seen_ids = HashSet::new();
        for record in &records {
            if !seen_ids.insert(record.bez_nr) {
                return Err(IndexError::validation(format!(
                    "Duplicate district id {ID_COLUMN}={}",
                    record.bez_nr
                )));
            }
        }

        Ok(Self { columns, records })
    }

    /// Build a dataset whose schema is every column any record carries,
    /// in first-seen order.
    pub fn from_records(records: Vec<DistrictRecord>) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for record in &records {
            for column in record.values.keys() {
                if seen.insert(column.clone()) {
                    columns.push(column.clone());
                }
            }
        }
        Self::new(columns, records)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[DistrictRecord] {
        &self.records
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<DistrictRecord>) {
        (self.columns, self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn has_geometry(&self) -> bool {
        self.records.iter().any(|r| r.geometry.is_some())
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.records.iter().map(|r| r.bez_nr)
    }

    /// Numeric view of a column; non-numeric entries become `None`.
    pub fn numeric_column(&self, column: &str) -> Result<Vec<Option<f64>>> {
        if !self.has_column(column) {
            return Err(IndexError::missing_column(column));
        }
        Ok(self
            .records
            .iter()
            .map(|r| r.value(column).as_number())
            .collect())
    }

    /// Replace a column's values, adding it to the schema if needed.
    pub(crate) fn set_column(&mut self, column: &str, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.records.len());
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
        for (record, value) in self.records.iter_mut().zip(values) {
            record.values.insert(column.to_string(), value);
        }
    }

    /// Left-join `columns` of `other` onto this dataset by `bez_nr`.
    ///
    /// Districts without a partner in `other` get missing values.
    pub fn left_join(&self, other: &Dataset, columns: &[&str]) -> Result<Dataset> {
        for column in columns {
            if !other.has_column(column) {
                return Err(IndexError::missing_column(*column));
            }
            if self.has_column(column) {
                return Err(IndexError::validation(format!(
                    "Column `{column}` already present; refusing to overwrite on join"
                )));
            }
        }

        let partners: HashMap<i64, &DistrictRecord> =
            other.records.iter().map(|r| (r.bez_nr, r)).collect();

        let records = self
            .records
            .iter()
            .map(|record| {
                let mut joined = record.clone();
                if let Some(partner) = partners.get(&record.bez_nr) {
                    for column in columns {
                        let value = partner.value(column);
                        if !value.is_missing() {
                            joined.values.insert(column.to_string(), value.clone());
                        }
                    }
                }
                joined
            })
            .collect();

        let mut schema = self.columns.clone();
        schema.extend(columns.iter().map(|c| c.to_string()));
        log::debug!(
            "Joined {} column(s) onto {} districts ({} matched)",
            columns.len(),
            self.len(),
            self.ids().filter(|id| partners.contains_key(id)).count()
        );
        Dataset::new(schema, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Dataset {
        Dataset::from_records(vec![
            DistrictRecord::new(1, "Altstadt").with_value("einwohner", 20_000.0),
            DistrictRecord::new(2, "Maxvorstadt").with_value("einwohner", 50_000.0),
            DistrictRecord::new(3, "Schwabing").with_value("einwohner", 70_000.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Dataset::from_records(vec![
            DistrictRecord::new(1, "A"),
            DistrictRecord::new(1, "B"),
        ]);
        assert!(matches!(result, Err(IndexError::Validation(_))));
    }

    #[test]
    fn test_key_columns_cannot_be_value_columns() {
        let result = Dataset::new(vec!["name".into()], vec![]);
        assert!(matches!(result, Err(IndexError::Validation(_))));
    }

    #[test]
    fn test_numeric_column_coerces_and_reports_missing_columns() {
        let dataset = Dataset::from_records(vec![
            DistrictRecord::new(1, "A").with_value("x", "3.5"),
            DistrictRecord::new(2, "B").with_value("x", "n/a"),
            DistrictRecord::new(3, "C"),
        ])
        .unwrap();

        assert_eq!(
            dataset.numeric_column("x").unwrap(),
            vec![Some(3.5), None, None]
        );
        assert!(matches!(
            dataset.numeric_column("y"),
            Err(IndexError::MissingColumn(c)) if c == "y"
        ));
    }

    #[test]
    fn test_left_join_keeps_unmatched_rows_as_missing() {
        let parks = Dataset::from_records(vec![
            DistrictRecord::new(3, "Schwabing").with_value("parks_pro_1000_einw", 2.0),
            DistrictRecord::new(1, "Altstadt").with_value("parks_pro_1000_einw", 1.0),
            DistrictRecord::new(9, "Elsewhere").with_value("parks_pro_1000_einw", 9.0),
        ])
        .unwrap();

        let joined = base().left_join(&parks, &["parks_pro_1000_einw"]).unwrap();

        assert_eq!(joined.len(), 3);
        assert_eq!(
            joined.numeric_column("parks_pro_1000_einw").unwrap(),
            vec![Some(1.0), None, Some(2.0)]
        );
        assert_eq!(joined.columns(), &["einwohner", "parks_pro_1000_einw"]);
    }

    #[test]
    fn test_left_join_refuses_overwrite_and_unknown_columns() {
        let other = base();
        assert!(matches!(
            base().left_join(&other, &["einwohner"]),
            Err(IndexError::Validation(_))
        ));
        assert!(matches!(
            base().left_join(&other, &["flaeche_ha"]),
            Err(IndexError::MissingColumn(_))
        ));
    }
}
