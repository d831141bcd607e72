use crate::error::{ProcessingError, Result};
use crate::models::{CityMetadata, CityTimeSeries, RunWarning, StationDescriptor, StationRegistry};
use crate::processors::{
    ColumnNormalizer, DataMerger, IntegrityChecker, IntegrityReport, MetadataBuilder,
    StationContribution,
};
use crate::readers::RawRecordLoader;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Everything one city's pipeline produced.
#[derive(Debug, Clone)]
pub struct CityOutcome {
    pub series: CityTimeSeries,
    pub metadata: CityMetadata,
    pub warnings: Vec<RunWarning>,
    pub integrity: IntegrityReport,
    pub overridden_days: usize,
}

/// Result of a full rebuild, cities in sorted order.
#[derive(Debug, Clone, Default)]
pub struct RebuildOutput {
    pub series: Vec<CityTimeSeries>,
    pub metadata: Vec<CityMetadata>,
    pub warnings: Vec<RunWarning>,
    pub integrity: IntegrityReport,
}

impl RebuildOutput {
    pub fn total_records(&self) -> usize {
        self.series.iter().map(CityTimeSeries::len).sum()
    }

    fn push(&mut self, outcome: CityOutcome) {
        self.series.push(outcome.series);
        self.metadata.push(outcome.metadata);
        self.warnings.extend(outcome.warnings);
        self.integrity.absorb(outcome.integrity);
    }
}

/// Runs load → normalize → reconcile → summarize for every city, cities in parallel.
pub struct ParallelProcessor {
    max_workers: usize,
    loader: RawRecordLoader,
    normalizer: ColumnNormalizer,
    merger: DataMerger,
    metadata_builder: MetadataBuilder,
    checker: IntegrityChecker,
}

impl ParallelProcessor {
    pub fn new(raw_dir: impl Into<PathBuf>, max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            loader: RawRecordLoader::new(raw_dir),
            normalizer: ColumnNormalizer::new(),
            merger: DataMerger::new(),
            metadata_builder: MetadataBuilder::new(),
            checker: IntegrityChecker::new(),
        }
    }

    /// Rebuild every registered city.
    ///
    /// The first schema or integrity fault in any city aborts the whole run.
    pub fn process_registry(
        &self,
        registry: &StationRegistry,
        progress: Option<&ProgressReporter>,
    ) -> Result<RebuildOutput> {
        let cities: Vec<(&str, &[StationDescriptor])> = registry.iter().collect();
        let processed_count = AtomicUsize::new(0);

        if let Some(p) = progress {
            p.set_message(&format!("Processing {} cities...", cities.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let outcomes: Vec<CityOutcome> = pool.install(|| {
            cities
                .par_iter()
                .map(|(city, stations)| {
                    let result = self.process_city(city, stations);

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!("Finished {} ({}/{})", city, count, cities.len());
                    if let Some(p) = progress {
                        p.increment(1);
                    }

                    result
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut output = RebuildOutput::default();
        for outcome in outcomes {
            output.push(outcome);
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!("Processed {} cities", cities.len()));
        }

        info!(
            "Rebuilt {} cities with {} records ({} warnings)",
            output.series.len(),
            output.total_records(),
            output.warnings.len()
        );

        Ok(output)
    }

    /// Load, normalize and reconcile one city. Stations are handled in priority order.
    pub fn process_city(&self, city: &str, stations: &[StationDescriptor]) -> Result<CityOutcome> {
        let mut warnings = Vec::new();
        let mut contributions = Vec::with_capacity(stations.len());

        for station in stations {
            if !station.is_daily() {
                let warning = RunWarning::UnsupportedGranularity {
                    city: city.to_string(),
                    station_name: station.station_name.clone(),
                    granularity: station.granularity,
                };
                warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            let raw = self.loader.load(station)?;
            let (records, stats) = self
                .normalizer
                .normalize_station(&raw, city, station.station_id);
            debug!("{}: {}", station, stats);

            if records.is_empty() {
                let warning = RunWarning::EmptyStation {
                    city: city.to_string(),
                    station_name: station.station_name.clone(),
                    station_id: station.station_id,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }

            contributions.push(StationContribution::new(station.clone(), records));
        }

        let (series, merge_stats) = self.merger.reconcile_with_stats(city, contributions);

        if series.is_empty() {
            let warning = RunWarning::EmptyCity {
                city: city.to_string(),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }

        let metadata = self.metadata_builder.summarize(&series);
        let integrity = self.checker.check_series(&series)?;

        info!(
            "{}: {} records, {} overlapping days resolved",
            city,
            series.len(),
            merge_stats.overridden
        );

        Ok(CityOutcome {
            series,
            metadata,
            warnings,
            integrity,
            overridden_days: merge_stats.overridden,
        })
    }
}
