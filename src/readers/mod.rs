pub mod raw_reader;
pub mod registry_reader;

pub use raw_reader::{LoadStats, RawRecordLoader};
pub use registry_reader::RegistryReader;
