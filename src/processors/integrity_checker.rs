use crate::error::{ProcessingError, Result};
use crate::models::{CanonicalRecord, CityTimeSeries};
use crate::utils::constants::{MAX_VALID_TEMP, MIN_VALID_TEMP, TEMP_JUMP_THRESHOLD};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub clean_records: usize,
    pub flagged_records: usize,
    pub temperature_violations: Vec<TemperatureViolation>,
    pub city_statistics: BTreeMap<String, CityStatistics>,
}

impl IntegrityReport {
    /// Fold another report into this one.
    ///
    /// Both reports must cover disjoint cities; the registry guarantees this.
    pub fn absorb(&mut self, other: IntegrityReport) {
        self.total_records += other.total_records;
        self.clean_records += other.clean_records;
        self.flagged_records += other.flagged_records;
        self.temperature_violations.extend(other.temperature_violations);
        for (city, stats) in other.city_statistics {
            let previous = self.city_statistics.insert(city, stats);
            debug_assert!(previous.is_none(), "city absorbed into integrity report twice");
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemperatureViolation {
    pub city: String,
    pub station_id: u32,
    pub date: NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    MinGreaterThanMax,
    OutOfRange,
    SuspiciousJump,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityStatistics {
    pub total_records: usize,
    pub flagged_records: usize,
    pub coldest: Option<f32>,
    pub warmest: Option<f32>,
}

pub struct IntegrityChecker {
    temperature_jump_threshold: f32,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            temperature_jump_threshold: TEMP_JUMP_THRESHOLD,
        }
    }

    pub fn with_jump_threshold(threshold: f32) -> Self {
        Self {
            temperature_jump_threshold: threshold,
        }
    }

    /// Check a reconciled city series.
    ///
    /// Duplicate or out-of-order dates are an internal fault; value
    /// anomalies are only reported.
    pub fn check_series(&self, series: &CityTimeSeries) -> Result<IntegrityReport> {
        self.check_ordering(series)?;

        let mut report = IntegrityReport {
            total_records: series.len(),
            ..Default::default()
        };
        let mut stats = CityStatistics {
            total_records: series.len(),
            ..Default::default()
        };

        for record in series {
            self.check_record(record, &mut report);

            if let Some(min) = record.min_temp_c {
                stats.coldest = Some(stats.coldest.map_or(min, |t| t.min(min)));
            }
            if let Some(max) = record.max_temp_c {
                stats.warmest = Some(stats.warmest.map_or(max, |t| t.max(max)));
            }
        }

        self.check_time_series_integrity(series.records(), &mut report);

        // A record counts once however many checks flag it
        let flagged: BTreeSet<NaiveDate> = report
            .temperature_violations
            .iter()
            .map(|v| v.date)
            .collect();
        report.flagged_records = flagged.len();
        report.clean_records = report.total_records - flagged.len();
        stats.flagged_records = flagged.len();

        report.city_statistics.insert(series.city().to_string(), stats);
        Ok(report)
    }

    fn check_ordering(&self, series: &CityTimeSeries) -> Result<()> {
        for pair in series.records().windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(ProcessingError::DataMerge(format!(
                    "{}: series not strictly ordered at {} -> {}",
                    series.city(),
                    pair[0].date,
                    pair[1].date
                )));
            }
        }

        if let Some(stray) = series.iter().find(|r| r.city != series.city()) {
            return Err(ProcessingError::DataMerge(format!(
                "{}: record for {} tagged with city '{}'",
                series.city(),
                stray.date,
                stray.city
            )));
        }

        Ok(())
    }

    fn check_record(&self, record: &CanonicalRecord, report: &mut IntegrityReport) {
        if let (Some(min), Some(max)) = (record.min_temp_c, record.max_temp_c) {
            if min > max {
                report.temperature_violations.push(violation(
                    record,
                    ViolationType::MinGreaterThanMax,
                    format!("min temperature {} exceeds max temperature {}", min, max),
                ));
            }
        }

        let temps = [
            (record.min_temp_c, "min"),
            (record.max_temp_c, "max"),
            (record.mean_temp_c, "mean"),
        ];

        for (temp, name) in temps {
            if let Some(temp) = temp {
                if !(MIN_VALID_TEMP..=MAX_VALID_TEMP).contains(&temp) {
                    report.temperature_violations.push(violation(
                        record,
                        ViolationType::OutOfRange,
                        format!(
                            "{} temperature {} is outside valid range [{}, {}]",
                            name, temp, MIN_VALID_TEMP, MAX_VALID_TEMP
                        ),
                    ));
                }
            }
        }
    }

    /// Flag large changes between consecutive calendar days
    fn check_time_series_integrity(&self, records: &[CanonicalRecord], report: &mut IntegrityReport) {
        for window in records.windows(2) {
            let prev = &window[0];
            let curr = &window[1];

            if (curr.date - prev.date).num_days() != 1 {
                continue;
            }

            let temps = [
                (prev.min_temp_c, curr.min_temp_c, "min"),
                (prev.max_temp_c, curr.max_temp_c, "max"),
                (prev.mean_temp_c, curr.mean_temp_c, "mean"),
            ];

            for (prev_temp, curr_temp, name) in temps {
                if let (Some(prev_temp), Some(curr_temp)) = (prev_temp, curr_temp) {
                    let jump = (curr_temp - prev_temp).abs();

                    if jump > self.temperature_jump_threshold {
                        report.temperature_violations.push(violation(
                            curr,
                            ViolationType::SuspiciousJump,
                            format!(
                                "{} temperature jumped {:.1}°C from {} to {}",
                                name, jump, prev.date, curr.date
                            ),
                        ));
                    }
                }
            }
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();
        let percent = |n: usize| {
            if report.total_records == 0 {
                0.0
            } else {
                100.0 * n as f64 / report.total_records as f64
            }
        };

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Clean Records: {} ({:.1}%)\n",
            report.clean_records,
            percent(report.clean_records)
        ));
        summary.push_str(&format!(
            "Flagged Records: {} ({:.1}%)\n",
            report.flagged_records,
            percent(report.flagged_records)
        ));
        summary.push_str(&format!(
            "\nTemperature Violations: {}\n",
            report.temperature_violations.len()
        ));

        if !report.temperature_violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, v) in report.temperature_violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} (station {}) on {}: {}\n",
                    i + 1,
                    v.city,
                    v.station_id,
                    v.date,
                    v.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn violation(record: &CanonicalRecord, violation_type: ViolationType, details: String) -> TemperatureViolation {
    TemperatureViolation {
        city: record.city.clone(),
        station_id: record.source_station_id,
        date: record.date,
        violation_type,
        details,
    }
}
