use crate::settings::SettingsOverrides;
use crate::writers::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate-merger")]
#[command(about = "Merge multi-station daily climate records into one series per city")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors; hide progress"
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the merged dataset and city metadata from raw station files
    Rebuild {
        #[arg(long, help = "Directory of raw {city}_{station} folders")]
        raw_dir: Option<PathBuf>,

        #[arg(short, long, help = "Directory receiving the merged outputs")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Station registry file (TOML or JSON)")]
        registry: Option<PathBuf>,

        #[arg(long, help = "Settings file layered under environment and flags")]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(short, long, help = "Parquet compression: snappy, gzip, lz4, zstd or none")]
        compression: Option<String>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, default_value = "false")]
        validate_only: bool,
    },
}

impl Commands {
    pub fn settings_overrides(&self) -> SettingsOverrides {
        match self {
            Commands::Rebuild {
                raw_dir,
                output_dir,
                registry,
                format,
                compression,
                max_workers,
                ..
            } => SettingsOverrides {
                raw_dir: raw_dir.clone(),
                output_dir: output_dir.clone(),
                registry_path: registry.clone(),
                format: *format,
                compression: compression.clone(),
                max_workers: *max_workers,
            },
        }
    }
}
