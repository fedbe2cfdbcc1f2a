use active_city::cli::{Cli, Commands};
use active_city::commands::{self, BuildConfig};
use active_city::formatting::{ColorMode, FormattingConfig};
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.verbosity());

    match cli.command {
        Commands::Build {
            base,
            indicators,
            output_dir,
            config,
            norm_method,
            fill_missing,
            top,
            plain,
            color,
            verbosity: _,
        } => {
            let build_config = BuildConfig {
                base,
                indicators,
                output_dir,
                config,
                norm_method: norm_method.map(Into::into),
                fill_missing,
                top,
                formatting_config: create_formatting_config(plain, color),
            };
            commands::handle_build(build_config)?;
            Ok(())
        }
        Commands::Init { force } => commands::init_config(force),
    }
}

// RUST_LOG wins over -v
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

// --plain, then --color, then NO_COLOR / CLICOLOR
fn create_formatting_config(plain: bool, color: Option<ColorMode>) -> FormattingConfig {
    match (plain, color) {
        (true, _) => FormattingConfig::plain(),
        (false, Some(mode)) => FormattingConfig::new(mode),
        (false, None) => FormattingConfig::from_env(),
    }
}
