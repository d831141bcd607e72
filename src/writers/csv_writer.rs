use crate::error::Result;
use crate::models::{CanonicalRecord, CityMetadata, CityTimeSeries};
use crate::utils::constants::DATE_FORMAT;
use chrono::Datelike;
use serde::Serialize;
use std::io::Write;

/// One line of the combined dataset.
#[derive(Debug, Serialize)]
struct DatasetRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Day")]
    day: u32,
    #[serde(rename = "City")]
    city: &'a str,
    #[serde(rename = "Max_Temp_C")]
    max_temp_c: Option<f32>,
    #[serde(rename = "Min_Temp_C")]
    min_temp_c: Option<f32>,
    #[serde(rename = "Mean_Temp_C")]
    mean_temp_c: Option<f32>,
    #[serde(rename = "Total_Precip_mm")]
    total_precip_mm: Option<f32>,
}

impl<'a> From<&'a CanonicalRecord> for DatasetRow<'a> {
    fn from(record: &'a CanonicalRecord) -> Self {
        Self {
            date: record.date.format(DATE_FORMAT).to_string(),
            year: record.date.year(),
            month: record.date.month(),
            day: record.date.day(),
            city: &record.city,
            max_temp_c: record.max_temp_c,
            min_temp_c: record.min_temp_c,
            mean_temp_c: record.mean_temp_c,
            total_precip_mm: record.total_precip_mm,
        }
    }
}

#[derive(Debug, Serialize)]
struct MetadataRow<'a> {
    #[serde(rename = "City")]
    city: &'a str,
    start_year: Option<i32>,
    end_year: Option<i32>,
    record_count: usize,
    first_date: Option<String>,
    last_date: Option<String>,
    missing_days: i64,
    gap_count: usize,
}

impl<'a> From<&'a CityMetadata> for MetadataRow<'a> {
    fn from(meta: &'a CityMetadata) -> Self {
        Self {
            city: &meta.city,
            start_year: meta.start_year,
            end_year: meta.end_year,
            record_count: meta.record_count,
            first_date: meta.first_date.map(|d| d.format(DATE_FORMAT).to_string()),
            last_date: meta.last_date.map(|d| d.format(DATE_FORMAT).to_string()),
            missing_days: meta.missing_days,
            gap_count: meta.gaps.len(),
        }
    }
}

const DATASET_HEADER: [&str; 9] = [
    "Date",
    "Year",
    "Month",
    "Day",
    "City",
    "Max_Temp_C",
    "Min_Temp_C",
    "Mean_Temp_C",
    "Total_Precip_mm",
];

const METADATA_HEADER: [&str; 8] = [
    "City",
    "start_year",
    "end_year",
    "record_count",
    "first_date",
    "last_date",
    "missing_days",
    "gap_count",
];

pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write all cities' records, in the order given, one row per city and date
    pub fn write_dataset<W: Write>(&self, series: &[CityTimeSeries], writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        // Header written explicitly so an all-empty run still gets one
        csv.write_record(DATASET_HEADER)?;

        for city in series {
            for record in city {
                csv.serialize(DatasetRow::from(record))?;
            }
        }

        csv.flush()?;
        Ok(())
    }

    pub fn write_metadata<W: Write>(&self, metadata: &[CityMetadata], writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        csv.write_record(METADATA_HEADER)?;

        for meta in metadata {
            csv.serialize(MetadataRow::from(meta))?;
        }

        csv.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
