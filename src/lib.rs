// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod scoring;
pub mod sensitivity;

// Re-export commonly used types
pub use crate::core::{Cell, Dataset, DistrictRecord, Domain, ID_COLUMN, NAME_COLUMN};

pub use crate::config::{
    ActiveCityConfig, IndicatorConfig, ScenarioSet, WeightConfig, WeightScenario,
    BASELINE_SCENARIO,
};

pub use crate::errors::{IndexError, Result};

pub use crate::scoring::{
    compute_index, compute_index_owned, normalize, normalize_series, IndexOptions,
    IndexedDataset, IndexedDistrict, NormMethod, SubIndices, COMPOSITE_COLUMN,
};

pub use crate::sensitivity::{
    compute_leave_one_out_sensitivity, compute_weight_sensitivity, spearman, Correlation,
    LeaveOneOutRow, LeaveOneOutTable, WeightSensitivityRow, WeightSensitivityTable,
};

pub use crate::io::{read_dataset, write_outputs};
