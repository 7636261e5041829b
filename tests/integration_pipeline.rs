//! End-to-end pipeline tests against a canned query engine.
//!
//! The external SQL engine is replaced by a fake implementing the
//! `QueryEngine` seam, so the full import -> validate -> transform ->
//! persist -> report sequence runs without a live Drill instance.

use async_trait::async_trait;
use polars::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;
use weather_pipeline::config::PipelineConfig;
use weather_pipeline::error::{Result, WeatherError};
use weather_pipeline::pipeline::WeatherPipeline;
use weather_pipeline::query::{QueryEngine, QueryResults};

const HEADER: &str = "ForecastSiteCode,ObservationTime,ObservationDate,WindDirection,\
    WindSpeed,WindGust,Visibility,ScreenTemperature,Pressure,SignificantWeatherCode,\
    SiteName,Latitude,Longitude,Region,Country";

/// Fake engine returning canned rows and recording submitted statements
struct FakeEngine {
    results: QueryResults,
    statements: Mutex<Vec<String>>,
}

impl FakeEngine {
    fn new(results: QueryResults) -> Self {
        Self {
            results,
            statements: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QueryEngine for FakeEngine {
    async fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, sql: &str) -> Result<QueryResults> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(self.results.clone())
    }
}

/// Engine that is never reachable
struct DownEngine;

#[async_trait]
impl QueryEngine for DownEngine {
    async fn ensure_available(&self) -> Result<()> {
        Err(WeatherError::EngineUnavailable {
            url: "http://localhost:8047".to_string(),
            reason: "connection refused".to_string(),
        })
    }

    async fn execute(&self, _sql: &str) -> Result<QueryResults> {
        panic!("execute must not be called when the engine is unavailable");
    }
}

fn canned_results() -> QueryResults {
    QueryResults {
        columns: vec![
            "DailyAverageTemperature".to_string(),
            "ObservationDate".to_string(),
            "Region".to_string(),
            "SiteName".to_string(),
        ],
        rows: vec![HashMap::from([
            ("ObservationDate".to_string(), json!("2016-02-01T00:00:00.000")),
            ("Region".to_string(), json!("Orkney & Shetland")),
            ("SiteName".to_string(), json!("Baltasound")),
            ("DailyAverageTemperature".to_string(), json!("2.1")),
        ])],
    }
}

fn write_monthly_file(dir: &TempDir, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    path
}

fn test_config(dir: &TempDir, inputs: Vec<PathBuf>) -> PipelineConfig {
    PipelineConfig {
        input_files: inputs,
        parquet_path: dir.path().join("weather.parquet"),
        coordinates_path: dir.path().join("ForecastSiteCords.csv"),
        export_coordinates: false,
        log_path: dir.path().join("error.log"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_full_pipeline_succeeds() {
    let dir = TempDir::new().unwrap();
    let input = write_monthly_file(
        &dir,
        "weather.20160201.csv",
        &[
            "3002,0,2016-02-01T00:00:00,12,8,-99,30000,2.1,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland",
            "3002,1,2016-02-01T00:00:00,12,8,-99,30000,2.1,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland",
            // exact duplicate of the previous row
            "3002,1,2016-02-01T00:00:00,12,8,-99,30000,2.1,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland",
        ],
    );
    let config = test_config(&dir, vec![input]);
    let parquet_path = config.parquet_path.clone();

    let engine = FakeEngine::new(canned_results());
    let report = WeatherPipeline::new(config, &engine).run().await.unwrap();

    assert_eq!(report.stats.rows_imported, 3);
    assert_eq!(report.stats.duplicates_dropped, 1);
    assert_eq!(report.stats.rows_written, 2);
    assert!(parquet_path.exists());

    // the statement addressed the persisted parquet file
    let statements = engine.statements.lock().unwrap();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].contains("weather.parquet"));

    let rendered = report.hottest_day.render();
    assert!(rendered.contains("Baltasound"));
    assert!(rendered.contains("2.1"));
}

#[tokio::test]
async fn test_persisted_parquet_is_enriched_and_deduplicated() {
    let dir = TempDir::new().unwrap();
    let input = write_monthly_file(
        &dir,
        "weather.20160201.csv",
        &[
            "3204,0,2016-02-01T00:00:00,12,8,5,500,2.1,997,8,RONALDSWAY (3204),54.085,-4.632,,",
            "3204,0,2016-02-01T00:00:00,12,8,5,500,2.1,997,8,RONALDSWAY (3204),54.085,-4.632,,",
        ],
    );
    let config = test_config(&dir, vec![input]);
    let parquet_path = config.parquet_path.clone();

    let engine = FakeEngine::new(canned_results());
    WeatherPipeline::new(config, &engine).run().await.unwrap();

    let df = ParquetReader::new(File::open(&parquet_path).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), 1);
    assert_eq!(df.width(), 19);

    let region = df.column("Region").unwrap().str().unwrap().get(0);
    assert_eq!(region, Some("Isle of Man"));
    let country = df.column("Country").unwrap().str().unwrap().get(0);
    assert_eq!(country, Some("Isle of Man"));
    let site = df.column("SiteName").unwrap().str().unwrap().get(0);
    assert_eq!(site, Some("Ronaldsway"));
    let visibility = df
        .column("VisibilityDescription")
        .unwrap()
        .str()
        .unwrap()
        .get(0);
    assert_eq!(visibility, Some("Very poor"));
}

#[tokio::test]
async fn test_validation_failure_stops_before_transform() {
    let dir = TempDir::new().unwrap();
    let input = write_monthly_file(
        &dir,
        "weather.20160201.csv",
        &[
            // 55.0 degrees is out of the screen temperature range
            "3002,0,2016-02-01T00:00:00,12,8,5,30000,55.0,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland",
        ],
    );
    let config = test_config(&dir, vec![input]);
    let parquet_path = config.parquet_path.clone();

    let engine = FakeEngine::new(canned_results());
    let err = WeatherPipeline::new(config, &engine)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WeatherError::DataValidation { violations: 1 }
    ));
    assert!(!parquet_path.exists());
    assert!(engine.statements.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_column_is_structural_and_skips_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("weather.20160201.csv");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "ForecastSiteCode,ObservationTime").unwrap();
    writeln!(file, "3002,0").unwrap();

    let config = test_config(&dir, vec![path]);
    let engine = FakeEngine::new(canned_results());
    let err = WeatherPipeline::new(config, &engine)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::StructuralImport { .. }));
}

#[tokio::test]
async fn test_unavailable_engine_fails_after_persist() {
    let dir = TempDir::new().unwrap();
    let input = write_monthly_file(
        &dir,
        "weather.20160201.csv",
        &[
            "3002,0,2016-02-01T00:00:00,12,8,5,30000,2.1,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland",
        ],
    );
    let config = test_config(&dir, vec![input]);
    let parquet_path = config.parquet_path.clone();

    let err = WeatherPipeline::new(config, &DownEngine)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::EngineUnavailable { .. }));
    // partial output from the prior successful stage is not rolled back
    assert!(parquet_path.exists());
}

#[tokio::test]
async fn test_coordinate_export_toggle() {
    let dir = TempDir::new().unwrap();
    let input = write_monthly_file(
        &dir,
        "weather.20160201.csv",
        &[
            "3002,0,2016-02-01T00:00:00,12,8,5,30000,2.1,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland",
            "3002,1,2016-02-01T00:00:00,12,8,5,30000,2.4,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,Scotland",
        ],
    );
    let mut config = test_config(&dir, vec![input]);
    config.export_coordinates = true;
    let coordinates_path = config.coordinates_path.clone();

    let engine = FakeEngine::new(canned_results());
    WeatherPipeline::new(config, &engine).run().await.unwrap();

    let content = std::fs::read_to_string(&coordinates_path).unwrap();
    assert!(content.starts_with("ForecastSiteCode,Latitude,Longitude"));
    // both observations come from the same site, exported once
    assert_eq!(content.trim_end().lines().count(), 2);
}
