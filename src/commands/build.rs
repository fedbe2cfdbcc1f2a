use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{self, ActiveCityConfig, IndicatorConfig};
use crate::core::Dataset;
use crate::formatting::FormattingConfig;
use crate::io::{self, SummaryPrinter};
use crate::scoring::{compute_index, IndexOptions, NormMethod};
use crate::sensitivity::{compute_leave_one_out_sensitivity, compute_weight_sensitivity};

pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";
pub const DEFAULT_TOP: usize = 10;

pub struct BuildConfig {
    pub base: PathBuf,
    pub indicators: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub norm_method: Option<NormMethod>,
    pub fill_missing: Option<f64>,
    pub top: Option<usize>,
    pub formatting_config: FormattingConfig,
}

/// Files written by a build, in write order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub written: Vec<PathBuf>,
    pub districts: usize,
}

pub fn handle_build(config: BuildConfig) -> Result<BuildReport> {
    config.formatting_config.apply();
    let file_config = config::load_config(config.config.as_deref())
        .context("Failed to load configuration")?;
    let options = resolve_index_options(&file_config, &config);
    let indicators = file_config.indicators();
    let weights = file_config.weights();
    let scenarios = file_config
        .scenario_set()
        .context("Invalid weight scenarios")?;

    let dataset = assemble_dataset(&config.base, &config.indicators, &indicators)?;

    let indexed = compute_index(&dataset, &indicators, &weights, &options)
        .context("Failed to compute the Active City Index")?;
    let weight_table = compute_weight_sensitivity(&indexed, &scenarios)
        .context("Weight scenario analysis failed")?;
    let leave_one_out =
        compute_leave_one_out_sensitivity(&dataset, &indicators, &weights, &options)
            .context("Leave-one-out analysis failed")?;

    let output_dir = config
        .output_dir
        .clone()
        .or_else(|| file_config.output_directory())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let written = io::write_outputs(&output_dir, &indexed, &weight_table, &leave_one_out)
        .with_context(|| format!("Failed to write outputs to {}", output_dir.display()))?;

    for path in &written {
        println!(
            "{} {}",
            config.formatting_config.success("Wrote:"),
            path.display()
        );
    }

    let top = config.top.or(file_config.top()).unwrap_or(DEFAULT_TOP);
    SummaryPrinter::new(config.formatting_config, top).print(
        &indexed,
        &weight_table,
        &leave_one_out,
    );

    Ok(BuildReport {
        written,
        districts: indexed.len(),
    })
}

// CLI flags win over the config file
fn resolve_index_options(file_config: &ActiveCityConfig, config: &BuildConfig) -> IndexOptions {
    let from_file = file_config.index_options();
    IndexOptions {
        norm_method: config.norm_method.unwrap_or(from_file.norm_method),
        fill_missing: config.fill_missing.unwrap_or(from_file.fill_missing),
    }
}

/// Read the base table and left-join every indicator table onto it.
///
/// Each indicator table contributes the configured indicator columns it
/// carries. Base properties repeated in an indicator table are ignored, and
/// an indicator already present keeps its first value.
pub fn assemble_dataset(
    base: &Path,
    indicator_tables: &[PathBuf],
    indicators: &IndicatorConfig,
) -> Result<Dataset> {
    let mut dataset = io::read_dataset(base)
        .with_context(|| format!("Failed to read base table {}", base.display()))?;

    for path in indicator_tables {
        let table = io::read_dataset(path)
            .with_context(|| format!("Failed to read indicator table {}", path.display()))?;
        let columns: Vec<&str> = indicators
            .all_columns()
            .into_iter()
            .filter(|c| table.has_column(c) && !dataset.has_column(c))
            .collect();
        if columns.is_empty() {
            log::warn!("{} contributes no new indicator columns", path.display());
            continue;
        }
        dataset = dataset
            .left_join(&table, &columns)
            .with_context(|| format!("Failed to join {}", path.display()))?;
    }

    Ok(dataset)
}
