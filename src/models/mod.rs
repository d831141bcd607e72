pub mod canonical;
pub mod columns;
pub mod raw;
pub mod registry;
pub mod series;
pub mod station;
pub mod warning;

pub use canonical::CanonicalRecord;
pub use columns::{CanonicalField, ColumnMapping, MappedColumn, SourceUnit};
pub use raw::{RawFileContext, RawRecord};
pub use registry::StationRegistry;
pub use series::{CityMetadata, CityTimeSeries, CoverageGap};
pub use station::{Granularity, StationDescriptor};
pub use warning::RunWarning;
