use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use validator::Validate;

/// Sampling interval of a station's raw data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Hourly,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Hourly => "hourly",
            Granularity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical station contributing records to a city.
///
/// Higher `priority` means more authoritative; on overlapping dates the
/// highest-priority station's record is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationDescriptor {
    pub station_id: u32,

    #[validate(length(min = 1))]
    pub station_name: String,

    #[validate(length(min = 1))]
    pub city: String,

    #[validate(range(min = 1800, max = 2100))]
    pub valid_from_year: i32,

    #[validate(range(min = 1800, max = 2100))]
    pub valid_to_year: i32,

    pub granularity: Granularity,

    pub priority: u32,
}

impl StationDescriptor {
    pub fn new(
        station_id: u32,
        station_name: impl Into<String>,
        city: impl Into<String>,
        valid_from_year: i32,
        valid_to_year: i32,
        granularity: Granularity,
        priority: u32,
    ) -> Self {
        Self {
            station_id,
            station_name: station_name.into(),
            city: city.into(),
            valid_from_year,
            valid_to_year,
            granularity,
            priority,
        }
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.valid_from_year..=self.valid_to_year
    }

    pub fn is_daily(&self) -> bool {
        self.granularity == Granularity::Daily
    }
}

impl fmt::Display for StationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, id {}, {}-{})",
            self.station_name, self.city, self.station_id, self.valid_from_year, self.valid_to_year
        )
    }
}
