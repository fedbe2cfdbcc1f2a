// Shared fixtures for active-city integration tests
#![allow(dead_code)]

use active_city::core::{Dataset, DistrictRecord};
use active_city::IndicatorConfig;
use std::path::{Path, PathBuf};

/// Indicator values per district in default indicator order:
/// parks, parks area, sports, sports area, stops, cycle lanes.
pub const SMALL_FIXTURE: [(i64, &str, [f64; 6]); 3] = [
    (1, "A", [1.0, 5.0, 0.1, 1.0, 10.0, 0.5]),
    (2, "B", [2.0, 5.0, 0.3, 2.0, 20.0, 0.8]),
    (3, "C", [3.0, 5.0, 0.2, 3.0, 30.0, 0.6]),
];

pub const SMALL_FIXTURE_CSV: &str = "\
bez_nr,name,einwohner,parks_pro_1000_einw,parks_area_anteil_prozent,sports_pro_1000_einw,sports_area_anteil_prozent,stops_pro_1000_einw,radweg_km_pro_km2
1,A,20000,1,5,0.1,1,10,0.5
2,B,50000,2,5,0.3,2,20,0.8
3,C,70000,3,5,0.2,3,30,0.6
";

/// Default indicator columns, green then sport then mob.
pub fn default_indicator_columns() -> Vec<String> {
    IndicatorConfig::default()
        .iter()
        .flat_map(|(_, columns)| columns.to_vec())
        .collect()
}

/// Dataset from `(id, name, values)` rows keyed by the default indicators.
pub fn dataset_from_rows(rows: &[(i64, &str, [f64; 6])]) -> Dataset {
    let columns = default_indicator_columns();
    let records = rows
        .iter()
        .map(|(id, name, values)| {
            columns
                .iter()
                .zip(values)
                .fold(DistrictRecord::new(*id, *name), |record, (column, value)| {
                    record.with_value(column.as_str(), *value)
                })
        })
        .collect();
    Dataset::new(columns, records).expect("fixture dataset is valid")
}

pub fn small_dataset() -> Dataset {
    dataset_from_rows(&SMALL_FIXTURE)
}

// Helper to create temporary input files
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}
