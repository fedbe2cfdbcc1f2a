// Sub-modules
pub mod indicators;
pub mod scenarios;
pub mod scoring;

// Core configuration types
mod core;
pub mod loader;

pub use indicators::IndicatorConfig;
pub use scenarios::{ScenarioSet, WeightScenario, BASELINE_SCENARIO};
pub use scoring::{WeightConfig, WEIGHT_SUM_TOLERANCE};

pub use self::core::{ActiveCityConfig, IndexSettings, OutputConfig};
pub use loader::{load_config, load_config_from, CONFIG_FILE_NAME};
