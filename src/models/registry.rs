use crate::error::{ProcessingError, Result};
use crate::models::StationDescriptor;
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

/// Validated mapping of city → stations in ascending priority.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRegistry {
    cities: BTreeMap<String, Vec<StationDescriptor>>,
}

impl StationRegistry {
    /// Build a registry from per-city descriptor lists.
    ///
    /// Rejects cities without stations, inverted year ranges, duplicate
    /// priorities, ids or names within a city and duplicate city entries.
    pub fn new(entries: Vec<(String, Vec<StationDescriptor>)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ProcessingError::Config(
                "registry defines no cities".to_string(),
            ));
        }

        let mut cities = BTreeMap::new();

        for (city, mut stations) in entries {
            if city.trim().is_empty() {
                return Err(ProcessingError::Config(
                    "registry contains a city with an empty name".to_string(),
                ));
            }

            if stations.is_empty() {
                return Err(ProcessingError::Config(format!(
                    "city '{}' has no stations",
                    city
                )));
            }

            let mut priorities = BTreeSet::new();
            let mut ids = BTreeSet::new();
            let mut names = BTreeSet::new();
            for station in &stations {
                Self::validate_station(&city, station)?;

                if !priorities.insert(station.priority) {
                    return Err(ProcessingError::Config(format!(
                        "city '{}' has more than one station with priority {}",
                        city, station.priority
                    )));
                }

                if !ids.insert(station.station_id) {
                    return Err(ProcessingError::Config(format!(
                        "city '{}' lists station id {} more than once",
                        city, station.station_id
                    )));
                }

                // Raw file directories are keyed by station name
                if !names.insert(station.station_name.as_str()) {
                    return Err(ProcessingError::Config(format!(
                        "city '{}' lists station '{}' more than once",
                        city, station.station_name
                    )));
                }
            }

            stations.sort_by_key(|s| s.priority);

            if cities.insert(city.clone(), stations).is_some() {
                return Err(ProcessingError::Config(format!(
                    "city '{}' is defined more than once",
                    city
                )));
            }
        }

        Ok(Self { cities })
    }

    fn validate_station(city: &str, station: &StationDescriptor) -> Result<()> {
        if station.city != city {
            return Err(ProcessingError::Config(format!(
                "station {} is tagged with city '{}' but listed under '{}'",
                station.station_id, station.city, city
            )));
        }

        if station.valid_from_year > station.valid_to_year {
            return Err(ProcessingError::Config(format!(
                "station {} of '{}' has start year {} after end year {}",
                station.station_name, city, station.valid_from_year, station.valid_to_year
            )));
        }

        station.validate()?;
        Ok(())
    }

    /// Stations of one city, least authoritative first.
    pub fn list_stations(&self, city: &str) -> Result<&[StationDescriptor]> {
        self.cities
            .get(city)
            .map(Vec::as_slice)
            .ok_or_else(|| ProcessingError::Config(format!("unknown city '{}'", city)))
    }

    pub fn all_cities(&self) -> BTreeSet<String> {
        self.cities.keys().cloned().collect()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn station_count(&self) -> usize {
        self.cities.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[StationDescriptor])> {
        self.cities
            .iter()
            .map(|(city, stations)| (city.as_str(), stations.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Granularity;

    fn station(id: u32, city: &str, from: i32, to: i32, priority: u32) -> StationDescriptor {
        StationDescriptor::new(
            id,
            format!("STATION_{}", id),
            city,
            from,
            to,
            Granularity::Daily,
            priority,
        )
    }

    #[test]
    fn test_stations_sorted_by_priority() {
        let registry = StationRegistry::new(vec![(
            "Calgary".to_string(),
            vec![
                station(50430, "Calgary", 2012, 2025, 2),
                station(2205, "Calgary", 1953, 2012, 1),
            ],
        )])
        .unwrap();

        let stations = registry.list_stations("Calgary").unwrap();
        assert_eq!(stations[0].station_id, 2205);
        assert_eq!(stations[1].station_id, 50430);
        assert_eq!(registry.station_count(), 2);
    }

    #[test]
    fn test_rejects_city_without_stations() {
        let err = StationRegistry::new(vec![("Regina".to_string(), vec![])]).unwrap_err();
        assert!(matches!(err, ProcessingError::Config(_)));
    }

    #[test]
    fn test_rejects_inverted_year_range() {
        let err = StationRegistry::new(vec![(
            "Regina".to_string(),
            vec![station(3002, "Regina", 2013, 2012, 1)],
        )])
        .unwrap_err();
        assert!(err.to_string().contains("start year 2013 after end year 2012"));
    }

    #[test]
    fn test_rejects_duplicate_priorities() {
        let err = StationRegistry::new(vec![(
            "Toronto".to_string(),
            vec![
                station(5097, "Toronto", 1953, 2013, 1),
                station(51459, "Toronto", 2013, 2025, 1),
            ],
        )])
        .unwrap_err();
        assert!(err.to_string().contains("priority 1"));
    }

    #[test]
    fn test_rejects_repeated_station_within_city() {
        let err = StationRegistry::new(vec![(
            "Edmonton".to_string(),
            vec![
                station(1865, "Edmonton", 1953, 2012, 1),
                station(1865, "Edmonton", 2012, 2025, 2),
            ],
        )])
        .unwrap_err();
        assert!(err.to_string().contains("station id 1865 more than once"));

        let mut renamed = station(27214, "Edmonton", 2012, 2025, 2);
        renamed.station_name = "STATION_1865".to_string();
        let err = StationRegistry::new(vec![(
            "Edmonton".to_string(),
            vec![station(1865, "Edmonton", 1953, 2012, 1), renamed],
        )])
        .unwrap_err();
        assert!(matches!(err, ProcessingError::Config(_)));
        assert!(err.to_string().contains("'STATION_1865' more than once"));
    }

    #[test]
    fn test_rejects_duplicate_city() {
        let err = StationRegistry::new(vec![
            ("Victoria".to_string(), vec![station(1202, "Victoria", 1953, 2013, 1)]),
            ("Victoria".to_string(), vec![station(51337, "Victoria", 2013, 2025, 1)]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_unknown_city_lookup() {
        let registry = StationRegistry::new(vec![(
            "Halifax".to_string(),
            vec![station(6358, "Halifax", 1953, 2012, 1)],
        )])
        .unwrap();

        assert!(registry.list_stations("Moncton").is_err());
        assert_eq!(
            registry.all_cities().into_iter().collect::<Vec<_>>(),
            vec!["Halifax".to_string()]
        );
    }
}
