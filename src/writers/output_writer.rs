use crate::error::Result;
use crate::models::{CityMetadata, CityTimeSeries};
use crate::utils::filename::{dataset_path, metadata_path};
use crate::writers::atomic::{commit_all, StagedFile};
use crate::writers::{CsvWriter, ParquetWriter};
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Paths written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub dataset: PathBuf,
    pub metadata: PathBuf,
}

/// Persists the combined dataset and metadata table together.
pub struct OutputWriter {
    format: OutputFormat,
    parquet: ParquetWriter,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            parquet: ParquetWriter::new(),
        }
    }

    /// Parquet compression codec; ignored for CSV output
    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.parquet = self.parquet.with_compression(compression)?;
        Ok(self)
    }

    /// Both files reflect this run, or neither existing file is touched.
    pub fn write(
        &self,
        series: &[CityTimeSeries],
        metadata: &[CityMetadata],
        destination: &Path,
    ) -> Result<WrittenFiles> {
        fs::create_dir_all(destination)?;

        let extension = self.format.extension();
        let mut dataset = StagedFile::new(&dataset_path(destination, extension))?;
        let mut meta = StagedFile::new(&metadata_path(destination, extension))?;

        match self.format {
            OutputFormat::Csv => {
                let csv = CsvWriter::new();
                csv.write_dataset(series, dataset.file_mut())?;
                csv.write_metadata(metadata, meta.file_mut())?;
            }
            OutputFormat::Parquet => {
                self.parquet.write_dataset(series, dataset.file_mut())?;
                self.parquet.write_metadata(metadata, meta.file_mut())?;
            }
        }

        let dataset_target = dataset.target().to_path_buf();
        let metadata_target = meta.target().to_path_buf();
        commit_all(vec![dataset, meta])?;

        info!(
            "Wrote {} and {}",
            dataset_target.display(),
            metadata_target.display()
        );

        Ok(WrittenFiles {
            dataset: dataset_target,
            metadata: metadata_target,
        })
    }
}
