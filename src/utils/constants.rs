/// Raw file naming
pub const RAW_FILE_SUFFIX: &str = "_daily_weather.csv";

/// Output file names
pub const DATASET_FILE_STEM: &str = "all_cities_weather_data";
pub const METADATA_FILE_STEM: &str = "cities_metadata";

/// Default locations, relative to the working directory
pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";
pub const DEFAULT_REGISTRY_PATH: &str = "config/cities.toml";

/// Environment variable prefix for layered settings
pub const ENV_PREFIX: &str = "CLIMATE_MERGER";

/// Temperature constraints (°C)
pub const MIN_VALID_TEMP: f32 = -65.0;
pub const MAX_VALID_TEMP: f32 = 50.0;

/// Day-to-day change in a temperature field that gets flagged (°C)
pub const TEMP_JUMP_THRESHOLD: f32 = 25.0;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Output date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
