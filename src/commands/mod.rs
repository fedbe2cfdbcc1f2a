//! CLI command implementations.
//!
//! Available commands:
//! - **build**: compute the index, run both sensitivity analyses and write
//!   the exports
//! - **init**: write a default `.active-city.toml`

pub mod build;
pub mod init;

pub use build::{assemble_dataset, handle_build, BuildConfig, BuildReport};
pub use init::init_config;
