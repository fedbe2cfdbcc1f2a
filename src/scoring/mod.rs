pub mod aggregator;
pub mod normalizer;

pub use aggregator::{
    compute_index, compute_index_owned, IndexOptions, IndexedDataset, IndexedDistrict,
    SubIndices, COMPOSITE_COLUMN, NORMALIZED_SUFFIX,
};
pub use normalizer::{normalize, normalize_filled, normalize_series, NormMethod};
