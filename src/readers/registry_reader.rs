use crate::error::{ProcessingError, Result};
use crate::models::{Granularity, StationDescriptor, StationRegistry};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    cities: Vec<CityEntry>,
}

#[derive(Debug, Deserialize)]
struct CityEntry {
    name: String,
    #[serde(default)]
    stations: Vec<StationEntry>,
}

#[derive(Debug, Deserialize)]
struct StationEntry {
    station_id: u32,
    station_name: String,
    start_year: i32,
    end_year: i32,
    #[serde(default = "default_data_type")]
    data_type: Granularity,
    priority: Option<u32>,
}

fn default_data_type() -> Granularity {
    Granularity::Daily
}

pub struct RegistryReader;

impl RegistryReader {
    pub fn new() -> Self {
        Self
    }

    /// Read and validate a registry file (TOML or JSON, chosen by extension)
    pub fn read_registry(&self, path: &Path) -> Result<StationRegistry> {
        info!("Loading station registry from {}", path.display());

        let source = Config::builder().add_source(File::from(path)).build()?;
        let registry = self.build_registry(source.try_deserialize()?)?;

        info!(
            "Registry holds {} cities and {} stations",
            registry.city_count(),
            registry.station_count()
        );
        Ok(registry)
    }

    /// Parse a registry from in-memory text
    pub fn parse_registry(&self, content: &str, format: FileFormat) -> Result<StationRegistry> {
        let source = Config::builder()
            .add_source(File::from_str(content, format))
            .build()?;
        self.build_registry(source.try_deserialize()?)
    }

    fn build_registry(&self, file: RegistryFile) -> Result<StationRegistry> {
        let mut entries = Vec::with_capacity(file.cities.len());

        for city in file.cities {
            let stations = Self::assign_priorities(&city)?;
            debug!("City '{}' has {} stations", city.name, stations.len());
            entries.push((city.name, stations));
        }

        StationRegistry::new(entries)
    }

    /// Use explicit priorities when every entry has one, list position when none do
    fn assign_priorities(city: &CityEntry) -> Result<Vec<StationDescriptor>> {
        let explicit = city.stations.iter().filter(|s| s.priority.is_some()).count();

        if explicit != 0 && explicit != city.stations.len() {
            return Err(ProcessingError::Config(format!(
                "city '{}' mixes stations with and without an explicit priority",
                city.name
            )));
        }

        Ok(city
            .stations
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                StationDescriptor::new(
                    entry.station_id,
                    entry.station_name.clone(),
                    city.name.clone(),
                    entry.start_year,
                    entry.end_year,
                    entry.data_type,
                    entry.priority.unwrap_or(position as u32 + 1),
                )
            })
            .collect())
    }
}

impl Default for RegistryReader {
    fn default() -> Self {
        Self::new()
    }
}
