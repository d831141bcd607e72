use crate::models::columns::{CanonicalField, ColumnMapping, SourceUnit};
use csv::StringRecord;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Header-level context shared by every row read from one raw file.
#[derive(Debug)]
pub struct RawFileContext {
    pub path: PathBuf,
    pub year: i32,
    pub mapping: ColumnMapping,
}

impl RawFileContext {
    pub fn new(path: PathBuf, year: i32, mapping: ColumnMapping) -> Self {
        Self {
            path,
            year,
            mapping,
        }
    }
}

/// One unparsed source row for one station on one calendar day.
#[derive(Debug, Clone)]
pub struct RawRecord {
    source: Arc<RawFileContext>,
    line: u64,
    values: StringRecord,
}

impl RawRecord {
    pub fn new(source: Arc<RawFileContext>, line: u64, values: StringRecord) -> Self {
        Self {
            source,
            line,
            values,
        }
    }

    /// Trimmed, non-empty text of a canonical field, if the file maps it.
    pub fn field(&self, field: CanonicalField) -> Option<&str> {
        self.source
            .mapping
            .get(field)
            .and_then(|column| self.values.get(column.index))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn unit(&self, field: CanonicalField) -> SourceUnit {
        self.source
            .mapping
            .get(field)
            .map_or(SourceUnit::None, |column| column.unit)
    }

    pub fn date(&self) -> Option<&str> {
        self.field(CanonicalField::Date)
    }

    pub fn max_temp(&self) -> Option<&str> {
        self.field(CanonicalField::MaxTemp)
    }

    pub fn min_temp(&self) -> Option<&str> {
        self.field(CanonicalField::MinTemp)
    }

    pub fn mean_temp(&self) -> Option<&str> {
        self.field(CanonicalField::MeanTemp)
    }

    pub fn precip(&self) -> Option<&str> {
        self.field(CanonicalField::TotalPrecip)
    }

    pub fn path(&self) -> &Path {
        &self.source.path
    }

    pub fn line(&self) -> u64 {
        self.line
    }
}
