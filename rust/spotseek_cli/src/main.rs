mod cli;
mod config;
mod errors;
mod processing;

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> std::result::Result<(), errors::CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    let args = Cli::parse();

    let conf = match std::fs::File::open(&args.config) {
        Ok(x) => x,
        Err(e) => return Err(errors::CliError::io(e, &args.config)),
    };
    let mut config: Config = match serde_json::from_reader(conf) {
        Ok(x) => x,
        Err(e) => {
            return Err(errors::CliError::ParseError { msg: e.to_string() });
        }
    };
    config.apply_cli_args(&args);

    let Some(input) = config.input.clone() else {
        return Err(errors::CliError::Config {
            source: "No input provided, please provide one in either the config file or with the --scans flag".to_string(),
        });
    };
    let Some(output) = config.output.clone() else {
        return Err(errors::CliError::Config {
            source: "No output directory provided, please provide one in either the config file or with the --output-dir flag".to_string(),
        });
    };
    info!("Parsed configuration: {:#?}", config);

    std::fs::create_dir_all(&output.directory)
        .map_err(|e| errors::CliError::io(e, &output.directory))?;

    let scans = processing::load_scans(&input.scans)?;
    processing::run_pipeline(&scans, input.mode, &config, &output)
}
