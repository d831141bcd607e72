use crate::error::{ProcessingError, Result};
use crate::models::{CityMetadata, CityTimeSeries};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

/// Days from 0001-01-01 (CE) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    fn properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }

    /// Write the combined dataset, one row group batch per city
    pub fn write_dataset<W: Write + Send>(&self, series: &[CityTimeSeries], writer: W) -> Result<()> {
        let schema = Self::dataset_schema();
        let mut writer = ArrowWriter::try_new(writer, schema.clone(), Some(self.properties()))?;

        for city in series.iter().filter(|s| !s.is_empty()) {
            let batch = Self::series_to_batch(city, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        Ok(())
    }

    pub fn write_metadata<W: Write + Send>(&self, metadata: &[CityMetadata], writer: W) -> Result<()> {
        let schema = Self::metadata_schema();
        let mut writer = ArrowWriter::try_new(writer, schema.clone(), Some(self.properties()))?;

        if !metadata.is_empty() {
            writer.write(&Self::metadata_to_batch(metadata, schema)?)?;
        }

        writer.close()?;
        Ok(())
    }

    fn dataset_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("Date", DataType::Date32, false),
            Field::new("Year", DataType::Int32, false),
            Field::new("Month", DataType::UInt32, false),
            Field::new("Day", DataType::UInt32, false),
            Field::new("City", DataType::Utf8, false),
            Field::new("Max_Temp_C", DataType::Float32, true),
            Field::new("Min_Temp_C", DataType::Float32, true),
            Field::new("Mean_Temp_C", DataType::Float32, true),
            Field::new("Total_Precip_mm", DataType::Float32, true),
        ];

        Arc::new(Schema::new(fields))
    }

    fn metadata_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("City", DataType::Utf8, false),
            Field::new("start_year", DataType::Int32, true),
            Field::new("end_year", DataType::Int32, true),
            Field::new("record_count", DataType::UInt64, false),
            Field::new("first_date", DataType::Date32, true),
            Field::new("last_date", DataType::Date32, true),
            Field::new("missing_days", DataType::Int64, false),
            Field::new("gap_count", DataType::UInt64, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn series_to_batch(series: &CityTimeSeries, schema: Arc<Schema>) -> Result<RecordBatch> {
        let records = series.records();

        let dates: Vec<i32> = records.iter().map(|r| date32(r.date)).collect();
        let years: Vec<i32> = records.iter().map(|r| r.date.year()).collect();
        let months: Vec<u32> = records.iter().map(|r| r.date.month()).collect();
        let days: Vec<u32> = records.iter().map(|r| r.date.day()).collect();
        let cities: Vec<&str> = records.iter().map(|r| r.city.as_str()).collect();
        let max_temps: Vec<Option<f32>> = records.iter().map(|r| r.max_temp_c).collect();
        let min_temps: Vec<Option<f32>> = records.iter().map(|r| r.min_temp_c).collect();
        let mean_temps: Vec<Option<f32>> = records.iter().map(|r| r.mean_temp_c).collect();
        let precip: Vec<Option<f32>> = records.iter().map(|r| r.total_precip_mm).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(Date32Array::from(dates)),
            Arc::new(Int32Array::from(years)),
            Arc::new(UInt32Array::from(months)),
            Arc::new(UInt32Array::from(days)),
            Arc::new(StringArray::from(cities)),
            Arc::new(Float32Array::from(max_temps)),
            Arc::new(Float32Array::from(min_temps)),
            Arc::new(Float32Array::from(mean_temps)),
            Arc::new(Float32Array::from(precip)),
        ];

        let batch = RecordBatch::try_new(schema, columns)?;

        Ok(batch)
    }

    fn metadata_to_batch(metadata: &[CityMetadata], schema: Arc<Schema>) -> Result<RecordBatch> {
        let cities: Vec<&str> = metadata.iter().map(|m| m.city.as_str()).collect();
        let start_years: Vec<Option<i32>> = metadata.iter().map(|m| m.start_year).collect();
        let end_years: Vec<Option<i32>> = metadata.iter().map(|m| m.end_year).collect();
        let counts: Vec<u64> = metadata.iter().map(|m| m.record_count as u64).collect();
        let first: Vec<Option<i32>> = metadata.iter().map(|m| m.first_date.map(date32)).collect();
        let last: Vec<Option<i32>> = metadata.iter().map(|m| m.last_date.map(date32)).collect();
        let missing: Vec<i64> = metadata.iter().map(|m| m.missing_days).collect();
        let gaps: Vec<u64> = metadata.iter().map(|m| m.gaps.len() as u64).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(cities)),
            Arc::new(Int32Array::from(start_years)),
            Arc::new(Int32Array::from(end_years)),
            Arc::new(UInt64Array::from(counts)),
            Arc::new(Date32Array::from(first)),
            Arc::new(Date32Array::from(last)),
            Arc::new(Int64Array::from(missing)),
            Arc::new(UInt64Array::from(gaps)),
        ];

        let batch = RecordBatch::try_new(schema, columns)?;

        Ok(batch)
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}
