use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Schema error in {}: {message}", file.display())]
    Schema { file: PathBuf, message: String },

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Data merge error: {0}")]
    DataMerge(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Broad classes of failure, each with its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Schema,
    Io,
    Internal,
}

impl ProcessingError {
    pub fn schema(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Schema {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ProcessingError::Config(_)
            | ProcessingError::Settings(_)
            | ProcessingError::Validation(_) => ErrorCategory::Config,
            ProcessingError::Schema { .. } => ErrorCategory::Schema,
            ProcessingError::Io(_)
            | ProcessingError::Csv(_)
            | ProcessingError::Parquet(_)
            | ProcessingError::Arrow(_) => ErrorCategory::Io,
            ProcessingError::DataMerge(_) | ProcessingError::TaskJoin(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 2,
            ErrorCategory::Schema => 3,
            ErrorCategory::Io => 4,
            ErrorCategory::Internal => 1,
        }
    }
}

impl From<tempfile::PersistError> for ProcessingError {
    fn from(error: tempfile::PersistError) -> Self {
        ProcessingError::Io(error.error)
    }
}
