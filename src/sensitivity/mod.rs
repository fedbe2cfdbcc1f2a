//! Sensitivity analyses over a computed index.

pub mod correlation;
pub mod leave_one_out;
pub mod ranking;
pub mod weight_scenarios;

pub use correlation::{spearman, Correlation};
pub use leave_one_out::{
    compute_leave_one_out_sensitivity, LeaveOneOutRow, LeaveOneOutTable, LEAVE_ONE_OUT_COLUMNS,
};
pub use ranking::{average_rank, competition_rank};
pub use weight_scenarios::{
    compute_weight_sensitivity, delta_column, rank_column, score_column, WeightSensitivityRow,
    WeightSensitivityTable,
};
