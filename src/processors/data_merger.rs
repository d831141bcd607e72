use crate::models::{CanonicalRecord, CityTimeSeries, StationDescriptor};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Normalized records contributed by one station of a city.
#[derive(Debug, Clone)]
pub struct StationContribution {
    pub station: StationDescriptor,
    pub records: Vec<CanonicalRecord>,
}

impl StationContribution {
    pub fn new(station: StationDescriptor, records: Vec<CanonicalRecord>) -> Self {
        Self { station, records }
    }
}

/// Overlap accounting for one city's merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub input_records: usize,
    /// Dates where a later station replaced an earlier station's record.
    pub overridden: usize,
    /// Dates repeated within a single station's own files.
    pub repeated_within_station: usize,
}

/// Folds a city's stations into one daily series, later stations winning.
pub struct DataMerger {
    log_overrides: bool,
}

impl DataMerger {
    pub fn new() -> Self {
        Self {
            log_overrides: true,
        }
    }

    pub fn with_override_logging(log_overrides: bool) -> Self {
        Self { log_overrides }
    }

    pub fn reconcile(&self, city: &str, contributions: Vec<StationContribution>) -> CityTimeSeries {
        self.reconcile_with_stats(city, contributions).0
    }

    /// Merge contributions in ascending priority order.
    ///
    /// Each date keeps exactly one record: the one from the last station
    /// (highest priority) that has it. Overwrites replace the whole record.
    pub fn reconcile_with_stats(
        &self,
        city: &str,
        mut contributions: Vec<StationContribution>,
    ) -> (CityTimeSeries, MergeStats) {
        contributions.sort_by_key(|c| c.station.priority);

        let mut by_date: BTreeMap<NaiveDate, CanonicalRecord> = BTreeMap::new();
        let mut stats = MergeStats::default();

        for contribution in contributions {
            let station_id = contribution.station.station_id;
            let mut replaced = 0usize;

            for record in contribution.records {
                stats.input_records += 1;

                if let Some(previous) = by_date.insert(record.date, record) {
                    if previous.source_station_id == station_id {
                        stats.repeated_within_station += 1;
                    } else {
                        replaced += 1;
                    }
                }
            }

            if replaced > 0 && self.log_overrides {
                info!(
                    "{}: station {} overrides {} overlapping days",
                    city, contribution.station.station_name, replaced
                );
            }
            stats.overridden += replaced;
        }

        if stats.repeated_within_station > 0 {
            debug!(
                "{}: {} dates repeated within a single station were collapsed",
                city, stats.repeated_within_station
            );
        }

        (CityTimeSeries::from_date_map(city, by_date), stats)
    }
}

impl Default for DataMerger {
    fn default() -> Self {
        Self::new()
    }
}
