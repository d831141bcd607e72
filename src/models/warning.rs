use crate::models::Granularity;
use std::fmt;

/// Recoverable conditions surfaced at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunWarning {
    /// A station produced no usable records.
    EmptyStation {
        city: String,
        station_name: String,
        station_id: u32,
    },
    /// No station of a city produced usable records.
    EmptyCity { city: String },
    /// The descriptor's sampling interval is not part of the daily merge.
    UnsupportedGranularity {
        city: String,
        station_name: String,
        granularity: Granularity,
    },
}

impl RunWarning {
    pub fn city(&self) -> &str {
        match self {
            RunWarning::EmptyStation { city, .. }
            | RunWarning::EmptyCity { city }
            | RunWarning::UnsupportedGranularity { city, .. } => city,
        }
    }
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::EmptyStation {
                city,
                station_name,
                station_id,
            } => write!(
                f,
                "{}: station {} (id {}) yielded no usable records",
                city, station_name, station_id
            ),
            RunWarning::EmptyCity { city } => {
                write!(f, "{}: no usable records from any station", city)
            }
            RunWarning::UnsupportedGranularity {
                city,
                station_name,
                granularity,
            } => write!(
                f,
                "{}: station {} skipped ({} data is not merged)",
                city, station_name, granularity
            ),
        }
    }
}
