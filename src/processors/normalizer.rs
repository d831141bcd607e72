use crate::models::{
    CanonicalField, CanonicalRecord, ColumnMapping, MappedColumn, RawRecord, SourceUnit,
};
use chrono::NaiveDate;
use csv::StringRecord;
use std::fmt;
use tracing::{debug, trace};

/// Folded header → canonical field and source unit.
///
/// Headers are folded to lowercase ASCII alphanumerics before lookup, so
/// `Max Temp (°C)`, `Max Temp (Â°C)` and `Max_Temp_C` all hit `maxtempc`.
const HEADER_LOOKUP: &[(&str, CanonicalField, SourceUnit)] = &[
    ("datetime", CanonicalField::Date, SourceUnit::None),
    ("datetimelst", CanonicalField::Date, SourceUnit::None),
    ("datetimeutc", CanonicalField::Date, SourceUnit::None),
    ("date", CanonicalField::Date, SourceUnit::None),
    ("localdate", CanonicalField::Date, SourceUnit::None),
    ("maxtempc", CanonicalField::MaxTemp, SourceUnit::Celsius),
    ("maxtempf", CanonicalField::MaxTemp, SourceUnit::Fahrenheit),
    ("maxtemperaturec", CanonicalField::MaxTemp, SourceUnit::Celsius),
    ("mintempc", CanonicalField::MinTemp, SourceUnit::Celsius),
    ("mintempf", CanonicalField::MinTemp, SourceUnit::Fahrenheit),
    ("mintemperaturec", CanonicalField::MinTemp, SourceUnit::Celsius),
    ("meantempc", CanonicalField::MeanTemp, SourceUnit::Celsius),
    ("meantempf", CanonicalField::MeanTemp, SourceUnit::Fahrenheit),
    ("meantemperaturec", CanonicalField::MeanTemp, SourceUnit::Celsius),
    ("totalprecipmm", CanonicalField::TotalPrecip, SourceUnit::Millimetres),
    ("totalprecipcm", CanonicalField::TotalPrecip, SourceUnit::Centimetres),
    ("totalprecipin", CanonicalField::TotalPrecip, SourceUnit::Inches),
    ("totalprecipitationmm", CanonicalField::TotalPrecip, SourceUnit::Millimetres),
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Per-station counters for one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    pub accepted: usize,
    pub invalid_date: usize,
    pub no_temperature: usize,
}

impl NormalizationStats {
    pub fn discarded(&self) -> usize {
        self.invalid_date + self.no_temperature
    }

    pub fn total(&self) -> usize {
        self.accepted + self.discarded()
    }
}

impl fmt::Display for NormalizationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accepted, {} discarded ({} bad dates, {} without temperatures)",
            self.accepted,
            self.discarded(),
            self.invalid_date,
            self.no_temperature
        )
    }
}

/// Maps heterogeneous raw columns onto the canonical daily schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnNormalizer;

impl ColumnNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Fold a header to the lookup key form.
    pub fn fold_header(header: &str) -> String {
        header
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    pub fn lookup(header: &str) -> Option<(CanonicalField, SourceUnit)> {
        let key = Self::fold_header(header);
        HEADER_LOOKUP
            .iter()
            .find(|(name, _, _)| *name == key)
            .map(|(_, field, unit)| (*field, *unit))
    }

    /// Resolve a header row. Unknown columns are recorded as ignored; when
    /// two columns map to one field the leftmost wins.
    pub fn resolve_columns(&self, headers: &StringRecord) -> ColumnMapping {
        let mut mapping = ColumnMapping::default();

        for (index, header) in headers.iter().enumerate() {
            let header = header.trim();
            match Self::lookup(header) {
                Some((field, unit)) => {
                    let column = MappedColumn {
                        index,
                        header: header.to_string(),
                        unit,
                    };
                    if !mapping.assign(field, column) {
                        trace!("Column '{}' shadowed by earlier {} column", header, field);
                        mapping.ignored.push(header.to_string());
                    }
                }
                None => mapping.ignored.push(header.to_string()),
            }
        }

        mapping
    }

    /// Normalize one raw row, or `None` when it must be discarded.
    pub fn normalize(
        &self,
        raw: &RawRecord,
        city: &str,
        station_id: u32,
    ) -> Option<CanonicalRecord> {
        let date = raw.date().and_then(parse_date)?;

        let value = |field: CanonicalField| {
            raw.field(field)
                .and_then(parse_number)
                .map(|v| raw.unit(field).to_canonical(v))
        };

        let record = CanonicalRecord::new(
            city,
            station_id,
            date,
            value(CanonicalField::MaxTemp),
            value(CanonicalField::MinTemp),
            value(CanonicalField::MeanTemp),
            value(CanonicalField::TotalPrecip),
        );

        record.has_temperature_data().then_some(record)
    }

    /// Normalize every row of a station, counting what was dropped and why.
    pub fn normalize_station(
        &self,
        raws: &[RawRecord],
        city: &str,
        station_id: u32,
    ) -> (Vec<CanonicalRecord>, NormalizationStats) {
        let mut stats = NormalizationStats::default();
        let mut records = Vec::with_capacity(raws.len());

        for raw in raws {
            if raw.date().and_then(parse_date).is_none() {
                debug!(
                    "{}:{}: unparseable date {:?}",
                    raw.path().display(),
                    raw.line(),
                    raw.date()
                );
                stats.invalid_date += 1;
                continue;
            }

            match self.normalize(raw, city, station_id) {
                Some(record) => {
                    stats.accepted += 1;
                    records.push(record);
                }
                None => stats.no_temperature += 1,
            }
        }

        (records, stats)
    }
}

/// Parse a calendar date, accepting a trailing time-of-day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Parse-or-null numeric coercion; non-finite values count as null.
pub fn parse_number(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}
