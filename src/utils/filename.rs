use crate::models::StationDescriptor;
use crate::utils::constants::{DATASET_FILE_STEM, METADATA_FILE_STEM, RAW_FILE_SUFFIX};
use std::path::{Path, PathBuf};

/// Directory holding a station's raw files: `{city}_{station_name}`
pub fn station_directory_name(station: &StationDescriptor) -> String {
    format!("{}_{}", station.city, station.station_name)
}

/// Raw file for one station and year: `{raw_dir}/{city}_{station}/{year}_daily_weather.csv`
pub fn raw_file_path(raw_dir: &Path, station: &StationDescriptor, year: i32) -> PathBuf {
    raw_dir
        .join(station_directory_name(station))
        .join(format!("{}{}", year, RAW_FILE_SUFFIX))
}

/// Combined dataset path for the given file extension
pub fn dataset_path(output_dir: &Path, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", DATASET_FILE_STEM, extension))
}

/// Per-city metadata path for the given file extension
pub fn metadata_path(output_dir: &Path, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", METADATA_FILE_STEM, extension))
}
