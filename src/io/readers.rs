//! District tables from CSV and GeoJSON.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;

use crate::core::{Cell, Dataset, DistrictRecord, ID_COLUMN, NAME_COLUMN};
use crate::errors::{IndexError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    GeoJson,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("geojson") | Some("json") => Ok(Self::GeoJson),
            _ => Err(IndexError::invalid_argument(format!(
                "Unsupported input file {}: expected .csv, .geojson or .json",
                path.display()
            ))),
        }
    }
}

/// Read a district table, picking the format from the file extension.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let format = InputFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    let dataset = match format {
        InputFormat::Csv => read_csv(reader)?,
        InputFormat::GeoJson => read_geojson(reader)?,
    };
    log::info!(
        "Read {} districts with {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

/// CSV with a header row. `bez_nr` and `name` are required; every other
/// column becomes a value column.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let position = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| IndexError::missing_column(column))
    };
    let id_idx = position(ID_COLUMN)?;
    let name_idx = position(NAME_COLUMN)?;
    let value_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_idx && *i != name_idx)
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let fields = result?;
        let raw_id = fields.get(id_idx).unwrap_or_default();
        let bez_nr = parse_id(&Cell::parse(raw_id))
            .ok_or_else(|| invalid_id(row, raw_id))?;
        let name = fields.get(name_idx).unwrap_or_default().trim();
        let record = value_columns
            .iter()
            .fold(DistrictRecord::new(bez_nr, name), |record, (i, column)| {
                let cell = fields.get(*i).map(Cell::parse).unwrap_or_default();
                record.with_value(column.as_str(), cell)
            });
        records.push(record);
    }

    Dataset::new(
        value_columns.into_iter().map(|(_, column)| column).collect(),
        records,
    )
}

/// GeoJSON `FeatureCollection`. Feature properties become columns and the
/// geometry is carried through untouched.
pub fn read_geojson<R: Read>(reader: R) -> Result<Dataset> {
    let document: Value = serde_json::from_reader(reader)?;
    if document.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(IndexError::validation(
            "GeoJSON input must be a FeatureCollection",
        ));
    }
    let features = document
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| IndexError::validation("FeatureCollection has no `features` array"))?;

    let mut records = Vec::with_capacity(features.len());
    for (row, feature) in features.iter().enumerate() {
        let empty = serde_json::Map::new();
        let properties = feature
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let id_cell = properties.get(ID_COLUMN).map(Cell::from_json).unwrap_or_default();
        let bez_nr = parse_id(&id_cell).ok_or_else(|| invalid_id(row, &id_cell.to_string()))?;
        let name = properties
            .get(NAME_COLUMN)
            .map(Cell::from_json)
            .unwrap_or_default()
            .to_string();

        let mut record = properties
            .iter()
            .filter(|(key, _)| key.as_str() != ID_COLUMN && key.as_str() != NAME_COLUMN)
            .fold(DistrictRecord::new(bez_nr, name), |record, (key, value)| {
                record.with_value(key.as_str(), Cell::from_json(value))
            });
        if let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) {
            record = record.with_geometry(geometry.clone());
        }
        records.push(record);
    }

    Dataset::from_records(records)
}

// Integer ids, also accepting integral floats such as `7.0`
fn parse_id(cell: &Cell) -> Option<i64> {
    let value = cell.as_number()?;
    (value.fract() == 0.0 && value.abs() < i64::MAX as f64).then_some(value as i64)
}

fn invalid_id(row: usize, raw: &str) -> IndexError {
    IndexError::validation(format!(
        "Row {}: `{ID_COLUMN}` must be an integer, got {raw:?}",
        row + 1
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_csv_cells() {
        let input = indoc! {"
            bez_nr,name,einwohner,note
            1,Altstadt,20000,
            2,Maxvorstadt,,quiet
        "};
        let dataset = read_csv(input.as_bytes()).unwrap();
        assert_eq!(dataset.columns(), &["einwohner", "note"]);
        let records = dataset.records();
        assert_eq!(records[0].name, "Altstadt");
        assert_eq!(records[0].value("einwohner"), &Cell::Number(20000.0));
        assert_eq!(records[0].value("note"), &Cell::Missing);
        assert_eq!(records[1].value("einwohner"), &Cell::Missing);
        assert_eq!(records[1].value("note"), &Cell::Text("quiet".into()));
    }

    #[test]
    fn test_read_csv_requires_key_columns() {
        let input = "name,einwohner\nA,1\n";
        assert!(matches!(
            read_csv(input.as_bytes()),
            Err(IndexError::MissingColumn(c)) if c == "bez_nr"
        ));
    }

    #[test]
    fn test_read_csv_invalid_id_names_row() {
        let input = "bez_nr,name\n1,A\nx,B\n";
        match read_csv(input.as_bytes()) {
            Err(IndexError::Validation(message)) => assert!(message.contains("Row 2")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_integral_float_ids() {
        let input = "bez_nr,name\n7.0,A\n";
        let dataset = read_csv(input.as_bytes()).unwrap();
        assert_eq!(dataset.ids().collect::<Vec<_>>(), vec![7]);
        assert!(read_csv("bez_nr,name\n7.5,A\n".as_bytes()).is_err());
    }

    #[test]
    fn test_read_geojson_keeps_geometry() {
        let input = indoc! {r#"
            {
              "type": "FeatureCollection",
              "features": [
                {
                  "type": "Feature",
                  "properties": {"bez_nr": 1, "name": "Altstadt", "einwohner": 20000},
                  "geometry": {"type": "Point", "coordinates": [11.57, 48.13]}
                },
                {
                  "type": "Feature",
                  "properties": {"bez_nr": "2", "name": "Maxvorstadt", "einwohner": null},
                  "geometry": null
                }
              ]
            }
        "#};
        let dataset = read_geojson(input.as_bytes()).unwrap();
        assert_eq!(dataset.columns(), &["einwohner"]);
        assert!(dataset.has_geometry());
        let records = dataset.records();
        assert_eq!(records[1].bez_nr, 2);
        assert_eq!(records[1].value("einwohner"), &Cell::Missing);
        assert!(records[1].geometry.is_none());
    }

    #[test]
    fn test_read_geojson_rejects_other_documents() {
        let input = r#"{"type": "Feature", "properties": {}}"#;
        assert!(matches!(
            read_geojson(input.as_bytes()),
            Err(IndexError::Validation(_))
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("a/b.CSV")).unwrap(),
            InputFormat::Csv
        );
        assert_eq!(
            InputFormat::from_path(Path::new("b.geojson")).unwrap(),
            InputFormat::GeoJson
        );
        assert!(InputFormat::from_path(Path::new("b.gpkg")).is_err());
    }
}
