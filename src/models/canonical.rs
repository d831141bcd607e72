use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A normalized daily observation tagged with its city and source station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub city: String,
    pub source_station_id: u32,
    pub date: NaiveDate,
    pub max_temp_c: Option<f32>,
    pub min_temp_c: Option<f32>,
    pub mean_temp_c: Option<f32>,
    pub total_precip_mm: Option<f32>,
}

impl CanonicalRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        city: impl Into<String>,
        source_station_id: u32,
        date: NaiveDate,
        max_temp_c: Option<f32>,
        min_temp_c: Option<f32>,
        mean_temp_c: Option<f32>,
        total_precip_mm: Option<f32>,
    ) -> Self {
        Self {
            city: city.into(),
            source_station_id,
            date,
            max_temp_c,
            min_temp_c,
            mean_temp_c,
            total_precip_mm,
        }
    }

    pub fn has_temperature_data(&self) -> bool {
        self.max_temp_c.is_some() || self.min_temp_c.is_some() || self.mean_temp_c.is_some()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn temperature_range(&self) -> Option<f32> {
        match (self.min_temp_c, self.max_temp_c) {
            (Some(min), Some(max)) => Some(max - min),
            _ => None,
        }
    }
}
