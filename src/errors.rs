//! Error types for index computation and its surrounding I/O.
//!
//! Core operations (normalization, aggregation, the two sensitivity
//! analyses) only ever fail on configuration problems: an unknown
//! normalization method, an invalid weight table, a column the dataset does
//! not have, a scenario set without a baseline or a domain left without
//! indicators. Degenerate data (constant columns, all-missing columns) is
//! never an error.
//!
//! The remaining variants wrap the readers and writers in [`crate::io`].

use thiserror::Error;

use crate::core::Domain;

/// Main error type for active-city operations
#[derive(Debug, Error)]
pub enum IndexError {
    /// An argument outside the accepted vocabulary (e.g. a normalization method)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Weight, scenario, option or dataset validation failures
    #[error("Validation error: {0}")]
    Validation(String),

    /// An indicator column referenced by configuration is absent from the dataset
    #[error("Indicator column missing: {0}")]
    MissingColumn(String),

    /// Rank deltas need a scenario named `equal`
    #[error("Scenario missing: {0}")]
    MissingScenario(String),

    /// A domain ended up with no indicator columns
    #[error("Domain `{0}` has no indicator columns")]
    EmptyDomain(Domain),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV errors
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON / GeoJSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IndexError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, IndexError>;
