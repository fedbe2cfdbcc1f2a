use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use super::ensure_dir;
use super::export::{index_export, leave_one_out_export, weight_scenarios_export, ExportTable};
use crate::errors::Result;
use crate::scoring::IndexedDataset;
use crate::sensitivity::{LeaveOneOutTable, WeightSensitivityTable};

pub const INDEX_CSV_FILE: &str = "muc_active_city_index.csv";
pub const INDEX_GEOJSON_FILE: &str = "muc_active_city_index.geojson";
pub const WEIGHT_SCENARIOS_FILE: &str = "muc_active_city_weight_scenarios.csv";
pub const LEAVE_ONE_OUT_FILE: &str = "muc_active_city_leave_one_out.csv";

pub fn write_csv<W: Write>(table: &ExportTable, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|value| value.render()))?;
    }
    writer.flush()?;
    Ok(())
}

/// GeoJSON `FeatureCollection`, one feature per row with its geometry.
pub fn write_geojson<W: Write>(table: &ExportTable, mut writer: W) -> Result<()> {
    let features: Vec<Value> = table
        .rows
        .iter()
        .zip(&table.geometries)
        .map(|(row, geometry)| {
            let properties: Map<String, Value> = table
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| (column.clone(), value.to_json()))
                .collect();
            json!({
                "type": "Feature",
                "properties": properties,
                "geometry": geometry.clone().unwrap_or(Value::Null),
            })
        })
        .collect();
    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    serde_json::to_writer(&mut writer, &collection)?;
    writer.flush()?;
    Ok(())
}

fn write_to_file(
    path: &Path,
    table: &ExportTable,
    write: fn(&ExportTable, BufWriter<File>) -> Result<()>,
) -> Result<PathBuf> {
    write(table, BufWriter::new(File::create(path)?))?;
    log::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(path.to_path_buf())
}

/// Write every export into `directory`, returning the written paths in
/// order. The GeoJSON file is only written when districts carry geometry.
pub fn write_outputs(
    directory: &Path,
    indexed: &IndexedDataset,
    weights: &WeightSensitivityTable,
    leave_one_out: &LeaveOneOutTable,
) -> Result<Vec<PathBuf>> {
    ensure_dir(directory)?;

    let index = index_export(indexed, weights)?;
    let mut written = vec![write_to_file(
        &directory.join(INDEX_CSV_FILE),
        &index,
        write_csv,
    )?];
    if index.has_geometry() {
        written.push(write_to_file(
            &directory.join(INDEX_GEOJSON_FILE),
            &index,
            write_geojson,
        )?);
    } else {
        log::info!("No geometries in input, skipping {INDEX_GEOJSON_FILE}");
    }
    written.push(write_to_file(
        &directory.join(WEIGHT_SCENARIOS_FILE),
        &weight_scenarios_export(weights),
        write_csv,
    )?);
    written.push(write_to_file(
        &directory.join(LEAVE_ONE_OUT_FILE),
        &leave_one_out_export(leave_one_out),
        write_csv,
    )?);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::export::ExportValue;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn table() -> ExportTable {
        ExportTable {
            columns: vec!["bez_nr".into(), "name".into(), "score".into()],
            rows: vec![
                vec![
                    ExportValue::Integer(1),
                    ExportValue::Text("Altstadt, Lehel".into()),
                    ExportValue::Float(0.5),
                ],
                vec![
                    ExportValue::Integer(2),
                    ExportValue::Text("Ludwigsvorstadt".into()),
                    ExportValue::Empty,
                ],
            ],
            geometries: vec![Some(json!({"type": "Point", "coordinates": [1.0, 2.0]})), None],
        }
    }

    #[test]
    fn test_write_csv_six_decimals_and_quoting() {
        let mut buffer = Vec::new();
        write_csv(&table(), &mut buffer).unwrap();
        let expected = indoc! {r#"
            bez_nr,name,score
            1,"Altstadt, Lehel",0.500000
            2,Ludwigsvorstadt,
        "#};
        assert_eq!(String::from_utf8(buffer).unwrap(), expected);
    }

    #[test]
    fn test_write_geojson_features() {
        let mut buffer = Vec::new();
        write_geojson(&table(), &mut buffer).unwrap();
        let value: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["properties"]["bez_nr"], 1);
        assert_eq!(features[0]["geometry"]["type"], "Point");
        assert!(features[1]["geometry"].is_null());
        assert!(features[1]["properties"]["score"].is_null());
    }
}
