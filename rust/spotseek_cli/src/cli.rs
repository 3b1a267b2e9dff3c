use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the JSON scan file (will over-write the config file)
    #[arg(short, long)]
    pub scans: Option<PathBuf>,

    /// Path to the internal standard library (will over-write the config file)
    #[arg(short, long)]
    pub library: Option<PathBuf>,

    /// Path to the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}
