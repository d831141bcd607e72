use crate::models::CanonicalRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Date-ordered daily series for one city, at most one record per date.
///
/// Only constructible from a date-keyed map, so uniqueness and ordering hold
/// by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CityTimeSeries {
    city: String,
    records: Vec<CanonicalRecord>,
}

impl CityTimeSeries {
    pub fn empty(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            records: Vec::new(),
        }
    }

    pub fn from_date_map(city: impl Into<String>, by_date: BTreeMap<NaiveDate, CanonicalRecord>) -> Self {
        Self {
            city: city.into(),
            records: by_date.into_values().collect(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&CanonicalRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|index| &self.records[index])
    }
}

impl<'a> IntoIterator for &'a CityTimeSeries {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A run of consecutive calendar days with no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageGap {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

/// Coverage summary derived from a [`CityTimeSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMetadata {
    pub city: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub missing_days: i64,
    pub gaps: Vec<CoverageGap>,
    /// Records kept per source station, ordered by station id.
    pub station_records: BTreeMap<u32, usize>,
}

impl CityMetadata {
    pub fn has_coverage(&self) -> bool {
        self.record_count > 0
    }

    pub fn longest_gap(&self) -> Option<&CoverageGap> {
        self.gaps.iter().max_by_key(|gap| gap.days)
    }
}
