pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{dataset_path, metadata_path, raw_file_path, station_directory_name};
pub use progress::ProgressReporter;
