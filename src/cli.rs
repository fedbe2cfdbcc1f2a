use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::formatting::ColorMode;
use crate::scoring::NormMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NormMethodArg {
    /// Rescale each indicator to [0, 1]
    Minmax,
    /// Center on the mean and divide by the sample standard deviation
    Zscore,
}

impl From<NormMethodArg> for NormMethod {
    fn from(arg: NormMethodArg) -> Self {
        match arg {
            NormMethodArg::Minmax => NormMethod::MinMax,
            NormMethodArg::Zscore => NormMethod::ZScore,
        }
    }
}

fn parse_color_mode(s: &str) -> Result<ColorMode, String> {
    ColorMode::parse(s).ok_or_else(|| format!("expected auto, always or never, got `{s}`"))
}

#[derive(Parser, Debug)]
#[command(name = "active-city")]
#[command(
    about = "Active City Index for city districts with sensitivity analyses",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the index and both sensitivity tables and write the exports
    Build {
        /// District base table (.csv, .geojson or .json) with bez_nr and name
        #[arg(long)]
        base: PathBuf,

        /// Indicator tables joined onto the base by bez_nr (repeatable)
        #[arg(long = "indicators")]
        indicators: Vec<PathBuf>,

        /// Directory for the exported files
        #[arg(short, long = "output-dir")]
        output_dir: Option<PathBuf>,

        /// Configuration file (defaults to .active-city.toml discovery)
        #[arg(short, long, env = "ACTIVE_CITY_CONFIG")]
        config: Option<PathBuf>,

        /// Normalization method for indicator columns
        #[arg(long = "norm-method", value_enum)]
        norm_method: Option<NormMethodArg>,

        /// Value substituted for missing indicator values before normalization
        #[arg(long = "fill-missing", allow_negative_numbers = true)]
        fill_missing: Option<f64>,

        /// Number of districts shown in the summary
        #[arg(long = "top", visible_alias = "head")]
        top: Option<usize>,

        /// Plain output: no colors, ASCII tables
        #[arg(long)]
        plain: bool,

        /// When to color output: auto, always or never
        #[arg(long, value_name = "WHEN", value_parser = parse_color_mode, conflicts_with = "plain")]
        color: Option<ColorMode>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Build { verbosity, .. } => *verbosity,
            Commands::Init { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_arguments() {
        let cli = Cli::try_parse_from([
            "active-city",
            "build",
            "--base",
            "districts.geojson",
            "--indicators",
            "green.csv",
            "--indicators",
            "mobility.csv",
            "--norm-method",
            "zscore",
            "--fill-missing",
            "-1",
            "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Build {
                base,
                indicators,
                norm_method,
                fill_missing,
                verbosity,
                plain,
                ..
            } => {
                assert_eq!(base, PathBuf::from("districts.geojson"));
                assert_eq!(indicators.len(), 2);
                assert_eq!(norm_method, Some(NormMethodArg::Zscore));
                assert_eq!(fill_missing, Some(-1.0));
                assert_eq!(verbosity, 2);
                assert!(!plain);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_color_option() {
        let cli = Cli::try_parse_from([
            "active-city",
            "build",
            "--base",
            "b.csv",
            "--color",
            "Always",
        ])
        .unwrap();
        match cli.command {
            Commands::Build { color, .. } => assert_eq!(color, Some(ColorMode::Always)),
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from([
            "active-city", "build", "--base", "b.csv", "--color", "sometimes"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "active-city", "build", "--base", "b.csv", "--color", "never", "--plain"
        ])
        .is_err());
    }

    #[test]
    fn test_base_is_required() {
        assert!(Cli::try_parse_from(["active-city", "build"]).is_err());
    }
}
