use crate::error::{ProcessingError, Result};
use crate::models::{RawFileContext, RawRecord, StationDescriptor};
use crate::processors::ColumnNormalizer;
use crate::utils::filename::raw_file_path;
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to each expected yearly file of one station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub files_read: usize,
    pub files_missing: usize,
    pub files_empty: usize,
    pub files_unreadable: usize,
    pub rows: usize,
}

/// Reads every yearly raw file of a station descriptor.
pub struct RawRecordLoader {
    raw_dir: PathBuf,
    normalizer: ColumnNormalizer,
}

impl RawRecordLoader {
    pub fn new(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            normalizer: ColumnNormalizer::new(),
        }
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    /// Load all rows of a station across its valid year range
    pub fn load(&self, station: &StationDescriptor) -> Result<Vec<RawRecord>> {
        self.load_with_stats(station).map(|(records, _)| records)
    }

    pub fn load_with_stats(&self, station: &StationDescriptor) -> Result<(Vec<RawRecord>, LoadStats)> {
        let mut stats = LoadStats::default();
        let mut records = Vec::new();

        for year in station.years() {
            let path = raw_file_path(&self.raw_dir, station, year);

            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    info!("Skipping {}: file not found", path.display());
                    stats.files_missing += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    stats.files_unreadable += 1;
                    continue;
                }
            };

            match self.read_file(&path, year, &bytes)? {
                Some(rows) => {
                    stats.files_read += 1;
                    stats.rows += rows.len();
                    records.extend(rows);
                }
                None => {
                    warn!("Skipping {}: file is empty", path.display());
                    stats.files_empty += 1;
                }
            }
        }

        debug!(
            "Loaded {} rows for {} from {} files ({} missing, {} empty)",
            stats.rows, station, stats.files_read, stats.files_missing, stats.files_empty
        );

        Ok((records, stats))
    }

    /// Parse one raw file's bytes. `None` means the file holds no content at all.
    pub fn read_file(&self, path: &Path, year: i32, bytes: &[u8]) -> Result<Option<Vec<RawRecord>>> {
        let text = decode(bytes);
        if text.trim().is_empty() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let mapping = self.normalizer.resolve_columns(&headers);

        let missing = mapping.missing_required();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.output_name()).collect();
            return Err(ProcessingError::schema(
                path,
                format!("missing required columns: {}", names.join(", ")),
            ));
        }

        let context = Arc::new(RawFileContext::new(path.to_path_buf(), year, mapping));
        let mut rows = Vec::new();

        for result in reader.records() {
            match result {
                Ok(values) => {
                    let line = values.position().map_or(0, |p| p.line());
                    rows.push(RawRecord::new(context.clone(), line, values));
                }
                Err(e) => debug!("{}: skipping malformed row: {}", path.display(), e),
            }
        }

        Ok(Some(rows))
    }
}

/// Decode raw bytes as UTF-8 (BOM aware), falling back to Windows-1252.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text
}
