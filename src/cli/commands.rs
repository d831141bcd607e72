use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::processors::{IntegrityChecker, ParallelProcessor, RebuildOutput};
use crate::readers::RegistryReader;
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::writers::{OutputWriter, WrittenFiles};
use tracing::{debug, info};

/// Outcome of one rebuild.
#[derive(Debug)]
pub struct RebuildSummary {
    pub output: RebuildOutput,
    /// `None` in validate-only mode.
    pub written: Option<WrittenFiles>,
}

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli);

    match &cli.command {
        Commands::Rebuild {
            config,
            validate_only,
            ..
        } => {
            let settings = Settings::load(config.as_deref(), &cli.command.settings_overrides())?;
            let validate_only = *validate_only;
            let show_progress = !cli.quiet;

            let summary =
                tokio::task::spawn_blocking(move || rebuild(&settings, validate_only, show_progress))
                    .await??;

            if !cli.quiet {
                print_summary(&summary);
            }
        }
    }

    Ok(())
}

/// Full rebuild: registry → per-city merge → integrity report → atomic write.
pub fn rebuild(settings: &Settings, validate_only: bool, show_progress: bool) -> Result<RebuildSummary> {
    // Resolve the writer first so a bad codec fails before any data I/O
    let writer = OutputWriter::new(settings.format).with_compression(&settings.compression)?;
    let registry = RegistryReader::new().read_registry(&settings.registry_path)?;

    info!(
        "Rebuilding {} cities from {} with {} workers",
        registry.city_count(),
        settings.raw_dir.display(),
        settings.max_workers
    );

    let progress = ProgressReporter::new(
        registry.city_count() as u64,
        "Merging station records...",
        !show_progress,
    );
    let processor = ParallelProcessor::new(&settings.raw_dir, settings.max_workers);
    let output = processor.process_registry(&registry, Some(&progress))?;

    if validate_only {
        info!("Validation complete - no output files written");
        return Ok(RebuildSummary {
            output,
            written: None,
        });
    }

    let written = writer.write(&output.series, &output.metadata, &settings.output_dir)?;

    Ok(RebuildSummary {
        output,
        written: Some(written),
    })
}

fn print_summary(summary: &RebuildSummary) {
    let output = &summary.output;

    println!("\n{}", IntegrityChecker::new().generate_summary(&output.integrity));

    println!("City coverage:");
    for meta in &output.metadata {
        match (meta.start_year, meta.end_year) {
            (Some(start), Some(end)) => println!(
                "  {:<16} {}-{}  {} records, {} missing days",
                meta.city, start, end, meta.record_count, meta.missing_days
            ),
            _ => println!("  {:<16} no data", meta.city),
        }
    }

    if !output.warnings.is_empty() {
        println!("\n{} warnings:", output.warnings.len());
        for warning in &output.warnings {
            println!("  {}", warning);
        }
    }

    match &summary.written {
        Some(files) => {
            println!("\nDataset:  {}", files.dataset.display());
            println!("Metadata: {}", files.metadata.display());
        }
        None => println!("\nValidation complete - no output files written"),
    }
}

fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("climate_merger={}", cli.log_level())));

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init();

    if initialized.is_ok() {
        debug!("Logging initialized at level: {}", cli.log_level());
    }
}
