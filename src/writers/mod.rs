pub mod atomic;
pub mod csv_writer;
pub mod output_writer;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use output_writer::{OutputFormat, OutputWriter, WrittenFiles};
pub use parquet_writer::ParquetWriter;
