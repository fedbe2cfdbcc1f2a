pub mod dataset;
pub mod types;

pub use dataset::{Dataset, DistrictRecord, ID_COLUMN, NAME_COLUMN};
pub use types::{Cell, Domain};
