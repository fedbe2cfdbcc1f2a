use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# Active City Index configuration

# Indicator columns per domain. Sub-indices are the mean of the
# normalized columns of their domain.
[indicators]
green = ["parks_pro_1000_einw", "parks_area_anteil_prozent"]
sport = ["sports_pro_1000_einw", "sports_area_anteil_prozent"]
mob = ["stops_pro_1000_einw", "radweg_km_pro_km2"]

# Domain weights for the composite index; must sum to 1.0
[weights]
green = 0.3333333333333333
sport = 0.3333333333333333
mob = 0.3333333333333334

[index]
norm_method = "minmax"  # or "zscore"
fill_missing = 0.0

# Weight scenarios compared against "equal" (required)
[[scenarios]]
name = "equal"
weights = { green = 0.3333333333333333, sport = 0.3333333333333333, mob = 0.3333333333333334 }

[[scenarios]]
name = "green_focus"
weights = { green = 0.5, sport = 0.25, mob = 0.25 }

[[scenarios]]
name = "sport_focus"
weights = { green = 0.25, sport = 0.5, mob = 0.25 }

[[scenarios]]
name = "mob_focus"
weights = { green = 0.25, sport = 0.25, mob = 0.5 }

[output]
directory = "data/processed"
top = 10
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force).map(|_| ())
}

/// Write the default config into `dir`, returning its path.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_from, ActiveCityConfig, IndicatorConfig, ScenarioSet};
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = init_config_in(dir.path(), false).unwrap();
        let config: ActiveCityConfig = load_config_from(&path).unwrap();
        assert_eq!(config.indicators(), IndicatorConfig::default());
        assert_eq!(
            config.scenario_set().unwrap().names(),
            ScenarioSet::default().names()
        );
        assert_eq!(config.top(), Some(10));
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        init_config_in(dir.path(), false).unwrap();
        assert!(init_config_in(dir.path(), false).is_err());
        assert!(init_config_in(dir.path(), true).is_ok());
    }
}
