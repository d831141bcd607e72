use chrono::NaiveDate;
use climate_merger::models::{
    CanonicalRecord, Granularity, RawFileContext, RawRecord, StationDescriptor,
};
use climate_merger::processors::{
    ColumnNormalizer, DataMerger, IntegrityChecker, MetadataBuilder, StationContribution,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use csv::StringRecord;
use std::path::PathBuf;
use std::sync::Arc;

const HEADER: [&str; 5] = [
    "Date/Time",
    "Max Temp (°C)",
    "Min Temp (°C)",
    "Mean Temp (°C)",
    "Total Precip (mm)",
];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}

fn create_raw_rows(days: usize) -> Vec<RawRecord> {
    let mapping = ColumnNormalizer::new().resolve_columns(&StringRecord::from(HEADER.to_vec()));
    let context = Arc::new(RawFileContext::new(
        PathBuf::from("1990_daily_weather.csv"),
        1990,
        mapping,
    ));

    (0..days)
        .map(|day| {
            let date = base_date() + chrono::Duration::days(day as i64);
            let mean = (day % 60) as f32 * 0.5 - 10.0;
            let values = StringRecord::from(vec![
                date.format("%Y-%m-%d").to_string(),
                format!("{:.1}", mean + 6.0),
                format!("{:.1}", mean - 6.0),
                format!("{:.1}", mean),
                if day % 3 == 0 { String::new() } else { "0.4".to_string() },
            ]);
            RawRecord::new(context.clone(), day as u64 + 2, values)
        })
        .collect()
}

/// Stations with staggered ranges that overlap their predecessor by a year
fn create_contributions(station_count: usize, days_per_station: usize) -> Vec<StationContribution> {
    (0..station_count)
        .map(|i| {
            let station_id = 1000 + i as u32;
            let offset = (i * (days_per_station - 365)) as i64;
            let station = StationDescriptor::new(
                station_id,
                format!("BENCH_{}", i),
                "Bench City",
                1990,
                2025,
                Granularity::Daily,
                i as u32 + 1,
            );
            let records = (0..days_per_station)
                .map(|day| {
                    let date = base_date() + chrono::Duration::days(offset + day as i64);
                    let t = (day % 40) as f32 - 20.0;
                    CanonicalRecord::new("Bench City", station_id, date, Some(t + 5.0), Some(t - 5.0), Some(t), None)
                })
                .collect();
            StationContribution::new(station, records)
        })
        .collect()
}

fn benchmark_normalizer(c: &mut Criterion) {
    let rows = create_raw_rows(3650);
    let normalizer = ColumnNormalizer::new();

    c.bench_function("normalize_station_decade", |b| {
        b.iter(|| {
            let (records, stats) = normalizer.normalize_station(&rows, "Calgary", 2205);
            black_box((records.len(), stats.accepted))
        })
    });
}

fn benchmark_header_lookup(c: &mut Criterion) {
    let headers = [
        "Date/Time",
        "Max Temp (°C)",
        "Max Temp (Â°C)",
        "Max Temp Flag",
        "Total_Precip_mm",
        "Heat Deg Days (°C)",
    ];

    c.bench_function("header_lookup", |b| {
        b.iter(|| {
            let hits = headers
                .iter()
                .filter(|h| ColumnNormalizer::lookup(h).is_some())
                .count();
            black_box(hits)
        })
    });
}

fn benchmark_reconciliation(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_by_station_count");

    for &stations in &[1usize, 2, 4, 8] {
        let contributions = create_contributions(stations, 3650);
        group.bench_with_input(BenchmarkId::new("stations", stations), &contributions, |b, input| {
            let merger = DataMerger::with_override_logging(false);
            b.iter(|| {
                let series = merger.reconcile("Bench City", input.clone());
                black_box(series.len())
            })
        });
    }

    group.finish();
}

fn benchmark_summaries(c: &mut Criterion) {
    let series = DataMerger::with_override_logging(false)
        .reconcile("Bench City", create_contributions(4, 3650));

    c.bench_function("metadata_summarize", |b| {
        let builder = MetadataBuilder::new();
        b.iter(|| black_box(builder.summarize(&series).record_count))
    });

    c.bench_function("integrity_check_series", |b| {
        let checker = IntegrityChecker::new();
        b.iter(|| {
            let report = checker.check_series(&series);
            black_box(report.map(|r| r.total_records).unwrap_or(0))
        })
    });
}

criterion_group!(
    benches,
    benchmark_normalizer,
    benchmark_header_lookup,
    benchmark_reconciliation,
    benchmark_summaries
);
criterion_main!(benches);
