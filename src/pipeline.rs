//! Pipeline orchestration.
//!
//! Composes the stages into the linear sequence
//! import -> validate -> transform -> persist -> aggregate-and-report.
//! The first failure aborts the remainder; every failure is logged with its
//! stage context before being re-signalled unchanged. Output persisted by a
//! prior successful stage is never rolled back.

use crate::config::PipelineConfig;
use crate::error::{Result, WeatherError};
use crate::models::PipelineStats;
use crate::query::{self, HottestDayReport, QueryEngine};
use crate::{export, import, schema, transform};
use std::time::Instant;
use tracing::{error, info};

/// Outcome of a full pipeline run
#[derive(Debug)]
pub struct PipelineReport {
    pub stats: PipelineStats,
    pub hottest_day: HottestDayReport,
}

/// Linear orchestrator over one immutable table value, re-bound at each stage
pub struct WeatherPipeline<'e> {
    config: PipelineConfig,
    engine: &'e dyn QueryEngine,
}

impl<'e> WeatherPipeline<'e> {
    pub fn new(config: PipelineConfig, engine: &'e dyn QueryEngine) -> Self {
        Self { config, engine }
    }

    /// Run the full pipeline and produce the hottest-day report
    pub async fn run(&self) -> Result<PipelineReport> {
        let start = Instant::now();
        info!(
            "Starting weather pipeline over {} input file(s)",
            self.config.input_files.len()
        );

        let raw = logged("import", import::import_many(&self.config.input_files))?;
        let rows_imported = raw.height();
        info!("Imported {rows_imported} rows");

        self.validate(&raw)?;
        info!("Validation passed");

        if self.config.export_coordinates {
            let sites = logged(
                "export-coordinates",
                export::export_site_coordinates(&raw, &self.config.coordinates_path),
            )?;
            info!("Exported {sites} site coordinates for reverse geocoding");
        }

        let enriched = logged("transform", transform::transform(raw))?;
        let rows_written = logged(
            "persist",
            export::write_weather_parquet(&enriched, &self.config.parquet_path),
        )?;
        info!(
            "Persisted {rows_written} rows to {}",
            self.config.parquet_path.display()
        );

        let locator = self.config.engine.storage_locator(&self.config.parquet_path);
        let hottest_day = logged(
            "aggregate",
            query::max_daily_average_temperature(self.engine, &locator).await,
        )?;

        let stats = PipelineStats {
            files_imported: self.config.input_files.len(),
            rows_imported,
            duplicates_dropped: rows_imported - rows_written,
            rows_written,
            output_path: self.config.parquet_path.clone(),
            processing_time_ms: start.elapsed().as_millis(),
        };
        info!("Pipeline succeeded in {}ms", stats.processing_time_ms);

        Ok(PipelineReport { stats, hottest_day })
    }

    /// Evaluate the schema; log every accumulated violation to the
    /// diagnostic sink, then raise a single validation error
    fn validate(&self, raw: &polars::prelude::DataFrame) -> Result<()> {
        let violations = logged("validate", schema::validate(raw))?;
        if violations.is_empty() {
            return Ok(());
        }

        for violation in &violations {
            error!("validation violation: {violation}");
        }
        let failure = WeatherError::DataValidation {
            violations: violations.len(),
        };
        error!(stage = "validate", error = %failure, "pipeline stage failed");
        Err(failure)
    }
}

/// Log a stage failure with full context before re-signalling it unchanged
fn logged<T>(stage: &str, result: Result<T>) -> Result<T> {
    if let Err(error) = &result {
        error!(stage = stage, error = %error, "pipeline stage failed");
    }
    result
}
