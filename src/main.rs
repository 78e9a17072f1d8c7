use anyhow::Context;
use clap::Parser;
use job_map::utils::error::ErrorSeverity;
use job_map::utils::{logger, validation::Validate};
use job_map::{
    CliConfig, JobMapError, JobMapPipeline, LocalStorage, MapEngine, NominatimGeocoder, RunConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting job-map");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        exit_with(e);
    }

    let geocoder = NominatimGeocoder::new(&config.settings.geocoder)
        .context("failed to build the geocoding HTTP client")?;
    let pipeline = JobMapPipeline::new(LocalStorage::current_dir(), config, geocoder);
    let engine = MapEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            for row in &report.skipped {
                tracing::debug!("Skipped row {}: {}", row.row, row.reason);
            }
            println!(
                "Map saved as {} ({} markers, {} of {} rows plotted)",
                report.output_path, report.markers, report.plotted_rows, report.total_rows
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Map generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_with(e)
        }
    }
}

fn exit_with(e: JobMapError) -> ! {
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
