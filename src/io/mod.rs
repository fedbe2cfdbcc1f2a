pub mod export;
pub mod readers;
pub mod terminal;
pub mod writers;

pub use export::{ExportTable, ExportValue, CONTEXT_COLUMNS};
pub use readers::{read_csv, read_dataset, read_geojson, InputFormat};
pub use terminal::SummaryPrinter;
pub use writers::{
    write_csv, write_geojson, write_outputs, INDEX_CSV_FILE, INDEX_GEOJSON_FILE,
    LEAVE_ONE_OUT_FILE, WEIGHT_SCENARIOS_FILE,
};

use crate::errors::Result;
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
