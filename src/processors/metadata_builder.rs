use crate::models::{CityMetadata, CityTimeSeries, CoverageGap};
use std::collections::BTreeMap;

/// Derives coverage metadata from a reconciled series.
pub struct MetadataBuilder;

impl MetadataBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, series: &CityTimeSeries) -> CityMetadata {
        let mut station_records: BTreeMap<u32, usize> = BTreeMap::new();
        for record in series {
            *station_records.entry(record.source_station_id).or_default() += 1;
        }

        let gaps = Self::find_gaps(series);
        let missing_days = gaps.iter().map(|gap| gap.days).sum();

        // Series is date-ordered, so the extremes are the endpoints
        let first = series.records().first();
        let last = series.records().last();

        CityMetadata {
            city: series.city().to_string(),
            start_year: first.map(|r| r.year()),
            end_year: last.map(|r| r.year()),
            record_count: series.len(),
            first_date: first.map(|r| r.date),
            last_date: last.map(|r| r.date),
            missing_days,
            gaps,
            station_records,
        }
    }

    fn find_gaps(series: &CityTimeSeries) -> Vec<CoverageGap> {
        series
            .records()
            .windows(2)
            .filter_map(|pair| {
                let (prev, next) = (pair[0].date, pair[1].date);
                let days = (next - prev).num_days() - 1;
                (days > 0).then(|| CoverageGap {
                    start: prev.succ_opt().unwrap_or(prev),
                    end: next.pred_opt().unwrap_or(next),
                    days,
                })
            })
            .collect()
    }
}

impl Default for MetadataBuilder {
    fn default() -> Self {
        Self::new()
    }
}
