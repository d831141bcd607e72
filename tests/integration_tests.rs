use climate_merger::cli::rebuild;
use climate_merger::readers::RegistryReader;
use climate_merger::writers::OutputFormat;
use climate_merger::{ProcessingError, Settings};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "\"Longitude (x)\",\"Latitude (y)\",\"Station Name\",\"Climate ID\",\"Date/Time\",\"Year\",\"Month\",\"Day\",\"Data Quality\",\"Max Temp (°C)\",\"Max Temp Flag\",\"Min Temp (°C)\",\"Min Temp Flag\",\"Mean Temp (°C)\",\"Mean Temp Flag\",\"Total Precip (mm)\",\"Total Precip Flag\"";

const CALGARY_REGISTRY: &str = r#"
[[cities]]
name = "Calgary"

[[cities.stations]]
station_id = 2205
station_name = "CALGARY_INTL_A_OLD"
start_year = 1953
end_year = 2012
data_type = "daily"

[[cities.stations]]
station_id = 50430
station_name = "CALGARY_INTL_A"
start_year = 2012
end_year = 2025
data_type = "daily"

[[cities]]
name = "Regina"

[[cities.stations]]
station_id = 3002
station_name = "REGINA_INTL_A_OLD"
start_year = 1953
end_year = 2012
data_type = "daily"
"#;

struct Workspace {
    _dir: TempDir,
    settings: Settings,
}

impl Workspace {
    fn new(registry: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let registry_path = dir.path().join("cities.toml");
        fs::write(&registry_path, registry).unwrap();

        let settings = Settings {
            raw_dir: dir.path().join("raw"),
            output_dir: dir.path().join("processed"),
            registry_path,
            format: OutputFormat::Csv,
            compression: "snappy".to_string(),
            max_workers: 2,
        };

        Self {
            _dir: dir,
            settings,
        }
    }

    /// Write one yearly raw file; rows are (date, max, min, mean, precip)
    fn write_year(&self, station_dir: &str, year: i32, rows: &[(&str, &str, &str, &str, &str)]) {
        let dir = self.settings.raw_dir.join(station_dir);
        fs::create_dir_all(&dir).unwrap();

        let mut content = String::from(HEADER);
        for (date, max, min, mean, precip) in rows {
            content.push_str(&format!(
                "\n\"-114.02\",\"51.11\",\"CALGARY\",\"3031092\",\"{}\",\"{}\",\"\",\"\",\"\",\"{}\",\"\",\"{}\",\"\",\"{}\",\"\",\"{}\",\"\"",
                date, year, max, min, mean, precip
            ));
        }
        fs::write(dir.join(format!("{}_daily_weather.csv", year)), content).unwrap();
    }

    fn dataset_path(&self) -> PathBuf {
        self.settings.output_dir.join("all_cities_weather_data.csv")
    }

    fn metadata_path(&self) -> PathBuf {
        self.settings.output_dir.join("cities_metadata.csv")
    }

    fn seed_calgary(&self) {
        self.write_year(
            "Calgary_CALGARY_INTL_A_OLD",
            1953,
            &[("1953-01-01", "-2.2", "-15.6", "-8.9", "0.0")],
        );
        self.write_year(
            "Calgary_CALGARY_INTL_A_OLD",
            2012,
            &[
                ("2012-06-14", "19.0", "7.0", "13.0", ""),
                ("2012-06-15", "18.0", "6.0", "12.0", "1.0"),
            ],
        );
        self.write_year(
            "Calgary_CALGARY_INTL_A",
            2012,
            &[
                ("2012-06-15", "21.4", "8.2", "14.8", "M"),
                ("2012-06-16", "23.0", "9.0", "16.0", "0.2"),
            ],
        );
        self.write_year(
            "Calgary_CALGARY_INTL_A",
            2025,
            &[("2025-12-31", "-4.1", "-12.0", "-8.1", "0.4")],
        );
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_calgary_overlap_prefers_newer_station() {
    let ws = Workspace::new(CALGARY_REGISTRY);
    ws.seed_calgary();

    let summary = rebuild(&ws.settings, false, false).unwrap();
    assert!(summary.written.is_some());

    let dataset = read(&ws.dataset_path());
    let lines: Vec<&str> = dataset.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Date,Year,Month,Day,City,Max_Temp_C,Min_Temp_C,Mean_Temp_C,Total_Precip_mm",
            "1953-01-01,1953,1,1,Calgary,-2.2,-15.6,-8.9,0.0",
            "2012-06-14,2012,6,14,Calgary,19.0,7.0,13.0,",
            "2012-06-15,2012,6,15,Calgary,21.4,8.2,14.8,",
            "2012-06-16,2012,6,16,Calgary,23.0,9.0,16.0,0.2",
            "2025-12-31,2025,12,31,Calgary,-4.1,-12.0,-8.1,0.4",
        ]
    );

    let calgary = &summary.output.metadata[0];
    assert_eq!(calgary.city, "Calgary");
    assert_eq!(calgary.start_year, Some(1953));
    assert_eq!(calgary.end_year, Some(2025));
    assert_eq!(calgary.record_count, 5);
    assert_eq!(calgary.station_records.get(&2205), Some(&2));
    assert_eq!(calgary.station_records.get(&50430), Some(&3));
}

#[test]
fn test_empty_city_reported_without_failing_run() {
    let ws = Workspace::new(CALGARY_REGISTRY);
    ws.seed_calgary();

    let summary = rebuild(&ws.settings, false, false).unwrap();

    let regina = &summary.output.metadata[1];
    assert_eq!(regina.city, "Regina");
    assert_eq!(regina.start_year, None);
    assert_eq!(regina.end_year, None);
    assert_eq!(regina.record_count, 0);
    assert!(summary
        .output
        .warnings
        .iter()
        .any(|w| w.to_string() == "Regina: no usable records from any station"));

    let metadata = read(&ws.metadata_path());
    assert!(metadata.lines().any(|line| line == "Regina,,,0,,,0,0"));
}

#[test]
fn test_schema_error_leaves_previous_outputs_untouched() {
    let ws = Workspace::new(CALGARY_REGISTRY);
    ws.seed_calgary();
    rebuild(&ws.settings, false, false).unwrap();
    let previous = read(&ws.dataset_path());

    let broken = ws.settings.raw_dir.join("Regina_REGINA_INTL_A_OLD");
    fs::create_dir_all(&broken).unwrap();
    fs::write(
        broken.join("1990_daily_weather.csv"),
        "\"Date/Time\",\"Max Temp (°C)\",\"Total Precip (mm)\"\n\"1990-01-01\",\"-20.0\",\"0.0\"\n",
    )
    .unwrap();

    let err = rebuild(&ws.settings, false, false).unwrap_err();

    assert!(matches!(err, ProcessingError::Schema { .. }));
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains("1990_daily_weather.csv"));
    assert_eq!(read(&ws.dataset_path()), previous);
    assert_eq!(fs::read_dir(&ws.settings.output_dir).unwrap().count(), 2);
}

#[test]
fn test_schema_error_on_first_run_writes_nothing() {
    let ws = Workspace::new(CALGARY_REGISTRY);
    let dir = ws.settings.raw_dir.join("Calgary_CALGARY_INTL_A");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("2013_daily_weather.csv"), "Date/Time,Year\n2013-01-01,2013\n").unwrap();

    let err = rebuild(&ws.settings, false, false).unwrap_err();

    assert_eq!(err.exit_code(), 3);
    assert!(!ws.dataset_path().exists());
    assert!(!ws.metadata_path().exists());
}

#[test]
fn test_rebuild_is_idempotent() {
    let ws = Workspace::new(CALGARY_REGISTRY);
    ws.seed_calgary();

    rebuild(&ws.settings, false, false).unwrap();
    let first_dataset = fs::read(ws.dataset_path()).unwrap();
    let first_metadata = fs::read(ws.metadata_path()).unwrap();

    rebuild(&ws.settings, false, false).unwrap();

    assert_eq!(fs::read(ws.dataset_path()).unwrap(), first_dataset);
    assert_eq!(fs::read(ws.metadata_path()).unwrap(), first_metadata);
}

#[test]
fn test_single_station_passes_records_through() {
    let ws = Workspace::new(
        r#"
[[cities]]
name = "Osoyoos"

[[cities.stations]]
station_id = 51406
station_name = "OSOYOOS_CS"
start_year = 2014
end_year = 2014
"#,
    );
    ws.write_year(
        "Osoyoos_OSOYOOS_CS",
        2014,
        &[
            ("2014-07-01", "31.5", "14.0", "22.8", "0.0"),
            ("2014-07-02", "33.0", "15.5", "24.3", ""),
            ("2014-07-03", "", "", "", "2.0"),
            ("2014-07-04", "29.9", "", "", ""),
        ],
    );

    let summary = rebuild(&ws.settings, false, false).unwrap();

    let series = &summary.output.series[0];
    assert_eq!(series.len(), 3);
    assert!(series.iter().all(|r| r.source_station_id == 51406));
    assert_eq!(summary.output.metadata[0].missing_days, 1);
}

#[test]
fn test_invalid_registry_fails_before_reading_data() {
    let ws = Workspace::new(
        r#"
[[cities]]
name = "Toronto"

[[cities.stations]]
station_id = 5097
station_name = "TORONTO_PEARSON_INTL_A_OLD"
start_year = 1953
end_year = 2013
priority = 1

[[cities.stations]]
station_id = 51459
station_name = "TORONTO_PEARSON_INTL_A"
start_year = 2013
end_year = 2025
priority = 1
"#,
    );

    let err = rebuild(&ws.settings, false, false).unwrap_err();

    assert!(matches!(err, ProcessingError::Config(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(!ws.settings.output_dir.exists());
}

#[test]
fn test_validate_only_writes_nothing() {
    let ws = Workspace::new(CALGARY_REGISTRY);
    ws.seed_calgary();

    let summary = rebuild(&ws.settings, true, false).unwrap();

    assert!(summary.written.is_none());
    assert_eq!(summary.output.total_records(), 5);
    assert!(!ws.settings.output_dir.exists());
}

#[test]
fn test_parquet_output() {
    let mut ws = Workspace::new(CALGARY_REGISTRY);
    ws.seed_calgary();
    ws.settings.format = OutputFormat::Parquet;
    ws.settings.compression = "zstd".to_string();

    let written = rebuild(&ws.settings, false, false).unwrap().written.unwrap();

    assert_eq!(
        written.dataset,
        ws.settings.output_dir.join("all_cities_weather_data.parquet")
    );
    assert!(written.metadata.exists());
}

#[test]
fn test_shipped_registry_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/cities.toml");
    let registry = RegistryReader::new().read_registry(&path).unwrap();

    assert_eq!(registry.city_count(), 15);
    assert_eq!(registry.station_count(), 30);

    let stations = registry.list_stations("Fort St. John").unwrap();
    assert_eq!(stations[0].station_id, 1413);
    assert_eq!(stations[1].station_id, 55198);
    assert!(registry.all_cities().contains("St. John's"));
}
