//! Command implementations for the weather pipeline CLI.
//!
//! Sets up the diagnostic log sink, dispatches subcommands and reports the
//! outcome. The log guard lives for the duration of each command so the
//! sink is flushed and closed on every exit path.

use crate::cli::args::{Args, Commands, RunArgs, ValidateArgs};
use crate::config::DEFAULT_LOG_PATH;
use crate::error::{Result, WeatherError};
use crate::query::drill::DrillEngine;
use crate::{import, logging, pipeline::WeatherPipeline, schema};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// Dispatch the parsed arguments. No subcommand runs the full pipeline
/// over the fixed default inputs.
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        None => run_pipeline(RunArgs::default()).await,
        Some(Commands::Run(run_args)) => run_pipeline(run_args).await,
        Some(Commands::Validate(validate_args)) => run_validation(validate_args).await,
    }
}

async fn run_pipeline(args: RunArgs) -> Result<()> {
    let config = args.into_config();
    config.validate()?;

    // Held until this function returns so the sink closes on both paths
    let _guard = logging::init(&config.log_path)?;
    info!("Weather pipeline starting");

    println!(
        "{}",
        "Starting weather observation pipeline".bright_green().bold()
    );
    for input in &config.input_files {
        println!("  {} {}", "Input:".bright_cyan(), input.display());
    }
    println!(
        "  {} {}",
        "Output:".bright_cyan(),
        config.parquet_path.display()
    );

    let engine = DrillEngine::new(&config.engine)?;
    let pipeline = WeatherPipeline::new(config, &engine);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    spinner.set_message("Running pipeline...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = pipeline.run().await;
    spinner.finish_and_clear();
    let report = result?;

    println!("\n{}", report.hottest_day.render());

    println!("{}", "Pipeline Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Rows imported:".bright_cyan(),
        report.stats.rows_imported.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Duplicates dropped:".bright_cyan(),
        report.stats.duplicates_dropped.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows written:".bright_cyan(),
        report.stats.rows_written.to_string().bright_white().bold()
    );
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        report.stats.processing_time_ms.to_string().bright_white()
    );

    Ok(())
}

async fn run_validation(args: ValidateArgs) -> Result<()> {
    let log_path = args
        .log_file
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));
    let _guard = logging::init(&log_path)?;

    let input_files = if args.input_files.is_empty() {
        crate::config::DEFAULT_INPUT_FILES
            .iter()
            .map(PathBuf::from)
            .collect()
    } else {
        args.input_files
    };

    let raw = import::import_many(&input_files)?;
    let violations = schema::validate(&raw)?;

    if violations.is_empty() {
        println!(
            "{} {} rows across {} file(s)",
            "Validation passed:".bright_green().bold(),
            raw.height(),
            input_files.len()
        );
        return Ok(());
    }

    for violation in &violations {
        error!("validation violation: {violation}");
        println!("  {} {}", "violation:".bright_red(), violation);
    }
    println!(
        "{} {} violation(s) found",
        "Validation failed:".bright_red().bold(),
        violations.len()
    );
    Err(WeatherError::DataValidation {
        violations: violations.len(),
    })
}
