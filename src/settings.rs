//! Layered run settings.
//!
//! Sources are applied in increasing precedence: built-in defaults, an
//! optional settings file, `CLIMATE_MERGER_*` environment variables, then
//! command-line overrides.

use crate::error::Result;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_OUTPUT_DIR, DEFAULT_RAW_DIR, DEFAULT_REGISTRY_PATH, ENV_PREFIX,
};
use crate::writers::OutputFormat;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Settings {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    pub registry_path: PathBuf,
    pub format: OutputFormat,
    #[validate(length(min = 1))]
    pub compression: String,
    #[validate(range(min = 1, max = 1024))]
    pub max_workers: usize,
}

/// Values supplied on the command line; `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub raw_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub registry_path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub compression: Option<String>,
    pub max_workers: Option<usize>,
}

fn path_value(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.to_string_lossy().into_owned())
}

impl Settings {
    pub fn load(config_file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("raw_dir", DEFAULT_RAW_DIR)?
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("registry_path", DEFAULT_REGISTRY_PATH)?
            .set_default("format", OutputFormat::Csv.extension())?
            .set_default("compression", COMPRESSION_SNAPPY)?
            .set_default("max_workers", num_cpus::get() as i64)?;

        if let Some(path) = config_file {
            debug!("Reading settings file {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("raw_dir", path_value(&overrides.raw_dir))?
            .set_override_option("output_dir", path_value(&overrides.output_dir))?
            .set_override_option("registry_path", path_value(&overrides.registry_path))?
            .set_override_option("format", overrides.format.map(|f| f.extension()))?
            .set_override_option("compression", overrides.compression.clone())?
            .set_override_option("max_workers", overrides.max_workers.map(|n| n as i64))?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!("Effective settings: {:?}", settings);
        Ok(settings)
    }
}
