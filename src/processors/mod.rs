pub mod data_merger;
pub mod integrity_checker;
pub mod metadata_builder;
pub mod normalizer;
pub mod parallel_processor;

pub use data_merger::{DataMerger, MergeStats, StationContribution};
pub use integrity_checker::{
    CityStatistics, IntegrityChecker, IntegrityReport, TemperatureViolation, ViolationType,
};
pub use metadata_builder::MetadataBuilder;
pub use normalizer::{ColumnNormalizer, NormalizationStats};
pub use parallel_processor::{CityOutcome, ParallelProcessor, RebuildOutput};
